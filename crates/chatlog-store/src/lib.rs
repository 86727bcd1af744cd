//! # chatlog-store
//!
//! In-memory message ledger with undo, lookup, ordering and flat-file
//! persistence.
//!
//! The crate exposes a single-owner [`ChatRoom`] value.  It holds the ordered
//! message sequence and the known users; every operation is synchronous and
//! runs to completion on the caller's thread.

pub mod codec;
pub mod lookup;
pub mod models;
pub mod ordering;
pub mod persist;
pub mod room;

mod error;

pub use error::{Result, StoreError};
pub use models::*;
pub use persist::LoadReport;
pub use room::ChatRoom;
