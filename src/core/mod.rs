pub mod config;
pub mod error;
pub mod types;

pub use config::ExplorationConfig;
pub use error::{ExploreError, Result};
