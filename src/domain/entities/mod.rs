//! Entity definitions for the domain layer.

pub mod delete;
pub mod link;

pub use delete::DeleteIntent;
pub use link::{AddOutcome, AddResult, BatchRecord, BatchResult, Record, StoredLink, UserUrl};
