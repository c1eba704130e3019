//! Ticket persistence
//!
//! [`DocumentStore`] is the boundary the lifecycle manager talks to. Two
//! implementations ship with the crate: [`FileStorage`] for the CLI and
//! [`MemoryStorage`] for embedding and tests.

mod file;
mod lock;
mod memory;
mod query;
mod repository;

pub use file::FileStorage;
pub use lock::{FileLock, STALE_LOCK_AGE};
pub use memory::MemoryStorage;
pub use query::{Direction, Field, FieldValue, Filter, RangeOp, TicketQuery, field_value};
pub use repository::DocumentStore;
