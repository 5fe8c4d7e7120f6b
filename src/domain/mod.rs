/// Domain module containing the core entities and their rules
///
/// This module defines the two tracked record kinds (Task and ReadingReminder),
/// the identity and locale types shared across the crate, the static surah
/// name tables, and the pre-dispatch validation gate.

pub mod reminder;
pub mod surah;
pub mod task;
pub mod types;
pub mod validate;

// Re-export public types for easy access
pub use reminder::*;
pub use task::*;
pub use types::*;
pub use validate::*;
