//! CLI command implementations.
//!
//! - **estimate**: run the pipeline and write the report
//! - **init**: write a default `.wardrobe.toml`
//! - **resolve**: show how labels map onto country keys

pub mod estimate;
pub mod init;
pub mod resolve;

pub use estimate::{apply_overrides, run_estimate};
pub use init::init_config;
pub use resolve::resolve_labels;
