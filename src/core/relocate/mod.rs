//! Duplicate relocation.
//!
//! Moves every member of each duplicate group into one destination folder,
//! which serves as a review bin. Moves are not transactional: a crash can
//! leave a batch half done, and re-running over the same index is safe
//! because members already in the destination are skipped.

mod executor;
mod types;

pub use executor::RelocationExecutor;
pub use types::*;
