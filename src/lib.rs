pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod providers;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;
pub use crate::config::TomlSettings;

pub use crate::adapters::storage::LocalStorage;
pub use crate::core::engine::{FarmEngine, RunSummary};
pub use crate::core::farm_results::FarmResultsService;
pub use crate::core::initialization::InitializationService;
pub use crate::core::replication::{replicate_farm, replicate_farms};
pub use crate::domain::events::{FarmResultsCalculatedEvent, FarmResultsEvents};
pub use crate::domain::model::Farm;
pub use crate::domain::results::FarmEmissionResults;
pub use crate::providers::DefaultDataTables;
pub use crate::utils::error::{FarmError, Result};
