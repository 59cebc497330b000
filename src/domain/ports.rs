use crate::domain::enums::ComponentCategory;
use crate::domain::model::{AnimalComponent, Farm};
use crate::domain::results::{
    AnimalComponentEmissionsResults, EconomicResultViewItem, FarmEmissionResults,
    FieldComponentEmissionResults, FinalFieldResult, NitrousOxideResults,
};
use crate::utils::error::Result;
use std::path::Path;

/// Field-side calculators the results pipeline delegates to.
pub trait FieldResultsService: Send + Sync {
    fn calculate_results_for_field_components(
        &self,
        farm: &Farm,
    ) -> Result<Vec<FieldComponentEmissionResults>>;

    fn calculate_mineral_n2o_emissions_for_farm(
        &self,
        farm: &Farm,
        results: &FarmEmissionResults,
    ) -> Result<NitrousOxideResults>;

    fn calculate_manure_n2o_emissions_for_farm(
        &self,
        farm: &Farm,
        results: &FarmEmissionResults,
    ) -> Result<NitrousOxideResults>;

    /// Runs after grazing uptake has been written back onto the farm's view items.
    fn calculate_final_results(
        &self,
        farm: &Farm,
        results: &FarmEmissionResults,
    ) -> Result<Vec<FinalFieldResult>>;
}

/// One calculator per livestock category.
pub trait AnimalResultsService: Send + Sync {
    fn category(&self) -> ComponentCategory;

    fn calculate_results_for_animal_components(
        &self,
        components: &[&AnimalComponent],
        farm: &Farm,
    ) -> Result<Vec<AnimalComponentEmissionsResults>>;
}

pub trait EconomicsCalculator: Send + Sync {
    fn calculate_crop_results(
        &self,
        farm: &Farm,
        final_field_results: &[FinalFieldResult],
    ) -> Result<Vec<EconomicResultViewItem>>;

    fn get_total_profit(&self, items: &[EconomicResultViewItem]) -> f64 {
        items.iter().map(|i| i.profit).sum()
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn monitor_enabled(&self) -> bool;
}
