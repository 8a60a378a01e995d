//! GitHub push webhook receiver that runs a restore script when the target
//! branch is updated.
//!
//! The functionality lives in the member crates; this crate re-exports them.

pub use restorehook_api;
pub use restorehook_core;
pub use restorehook_github;
pub use restorehook_trigger;
