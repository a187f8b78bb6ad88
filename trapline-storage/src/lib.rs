//! Preference storage for the operator console
//!
//! A namespaced key-value store for everything the console wants to
//! remember between screens or sessions: the cached zone list, the bearer
//! token, hidden and reordered zones. The store is passed into whatever
//! consumes it (there is no process-wide state) and backends are
//! swappable behind the [`PreferenceStore`] trait.

pub mod error;
pub mod file;
pub mod memory;
pub mod prefs;
pub mod traits;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use prefs::ConsolePrefs;
pub use traits::PreferenceStore;
