pub mod engine;
pub mod farm_results;
pub mod initialization;
pub mod interpolation;
pub mod manure_tanks;
pub mod replication;
pub mod uncertainty;

pub use crate::domain::ports::{
    AnimalResultsService, ConfigProvider, EconomicsCalculator, FieldResultsService, Storage,
};
pub use crate::utils::error::Result;
