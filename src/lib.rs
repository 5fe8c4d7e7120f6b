/// Public library interface for the Islamic Tracker core
///
/// The crate manages two record kinds, tasks and Quran reading reminders,
/// behind a single session API. A guest session persists everything in local
/// blob storage; logging in switches the same operations to the remote API
/// server. The session layer routes each operation, the validation gate
/// screens input before any adapter runs, and the two adapters implement the
/// shared `EntityStore` contract.

// Internal modules
mod domain;
mod session;
mod store;

// Re-export public modules and types
pub use domain::*;
pub use session::Session;
pub use store::{EntityStore, LocalStore, RemoteStore, StoreError, REMINDERS_KEY, TASKS_KEY};
