/// Shared identity and locale types
///
/// The session operates either as an anonymous guest or as a logged-in user.
/// Keeping that distinction in a sum type (instead of a magic "guest" string
/// mixed in with real ids) means the dispatch logic can never confuse the two.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier for a registered user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who owns the data for the current session
///
/// `Guest` data lives only in local storage under a single implicit owner;
/// `User` data is persisted remotely under the given id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Guest,
    User(UserId),
}

impl Identity {
    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest)
    }

    /// The owner value sent to the server as the `userId` parameter.
    ///
    /// The guest identity maps to the literal `"guest"`, which the server
    /// treats as "no persisted data" on every endpoint.
    pub fn as_owner_param(&self) -> &str {
        match self {
            Identity::Guest => "guest",
            Identity::User(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Guest => f.write_str("guest"),
            Identity::User(id) => write!(f, "user {}", id),
        }
    }
}

/// Display locale, which selects the surah name table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    Arabic,
    English,
}

impl Locale {
    /// Parse a locale tag ("ar" / "en"), case-insensitive
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Some(Locale::Arabic),
            "en" | "english" => Some(Locale::English),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Arabic => "ar",
            Locale::English => "en",
        }
    }
}
