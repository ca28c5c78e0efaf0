//! Client-side session for the agency dashboard.
//!
//! Owns the in-memory [`DomainStore`](cliqa_core::store::DomainStore), loads
//! it through the persistence bridge at startup and fires a whole-blob save
//! after every mutation without waiting for it to land.

pub mod bridge;
pub mod config;
pub mod error;
pub mod session;
pub mod slot;
pub mod sync;

pub use bridge::{HttpBridge, MemoryBridge, PersistenceBridge};
pub use config::SessionConfig;
pub use error::SessionError;
pub use session::Session;
pub use slot::FileSessionSlot;
pub use sync::SyncStatus;
