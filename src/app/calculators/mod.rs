// Reference implementations of the calculator ports.

pub mod animal;
pub mod economics;
pub mod field;

use std::sync::Arc;

use crate::core::farm_results::FarmResultsService;
use crate::domain::enums::ComponentCategory;
use crate::domain::ports::AnimalResultsService;
use crate::providers::DefaultDataTables;

pub use animal::ReferenceAnimalResultsService;
pub use economics::ReferenceEconomicsCalculator;
pub use field::ReferenceFieldResultsService;

/// One animal calculator per livestock category, in the order results are collected.
pub fn reference_animal_results_services() -> Vec<Box<dyn AnimalResultsService>> {
    [
        ComponentCategory::OtherLivestock,
        ComponentCategory::Swine,
        ComponentCategory::Poultry,
        ComponentCategory::Sheep,
        ComponentCategory::Dairy,
        ComponentCategory::BeefProduction,
    ]
    .into_iter()
    .map(|category| Box::new(ReferenceAnimalResultsService::new(category)) as Box<dyn AnimalResultsService>)
    .collect()
}

pub fn reference_results_service(tables: Arc<DefaultDataTables>) -> FarmResultsService {
    FarmResultsService::new(
        tables,
        Box::new(ReferenceFieldResultsService),
        reference_animal_results_services(),
        Box::new(ReferenceEconomicsCalculator),
    )
}
