use crate::app::calculators::animal::N2O_N_TO_N2O;
use crate::domain::model::{CropViewItem, Defaults, Farm};
use crate::domain::ports::FieldResultsService;
use crate::domain::results::{
    FarmEmissionResults, FieldComponentEmissionResults, FinalFieldResult, NitrousOxideResults,
};
use crate::utils::error::Result;

/// kg CO2 from fuel and herbicide energy over the item's area.
pub fn cropping_energy_emissions(item: &CropViewItem, defaults: &Defaults) -> f64 {
    (item.fuel_energy * defaults.emission_factor_for_diesel
        + item.herbicide_energy * defaults.emission_factor_for_herbicide)
        * item.area
}

/// Direct and indirect N2O from `nitrogen` kg N applied to soil.
pub fn soil_n2o(nitrogen: f64, defaults: &Defaults) -> NitrousOxideResults {
    let direct_n = nitrogen * defaults.fertilizer_direct_n2o_emission_factor;
    let indirect_n = nitrogen * defaults.fertilizer_volatilization_fraction * defaults.emission_factor_volatilization
        + nitrogen * defaults.leaching_fraction * defaults.emission_factor_leaching;

    NitrousOxideResults {
        direct_n2o: direct_n * N2O_N_TO_N2O,
        indirect_n2o: indirect_n * N2O_N_TO_N2O,
    }
}

/// 田區的能源、施肥與最終逐年結果
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceFieldResultsService;

impl FieldResultsService for ReferenceFieldResultsService {
    fn calculate_results_for_field_components(
        &self,
        farm: &Farm,
    ) -> Result<Vec<FieldComponentEmissionResults>> {
        Ok(farm
            .field_components()
            .map(|field| FieldComponentEmissionResults {
                component_guid: field.guid,
                component_name: field.name.clone(),
                cropping_energy_emissions: field
                    .crop_view_items
                    .iter()
                    .map(|i| cropping_energy_emissions(i, &farm.defaults))
                    .sum(),
                fertilizer_nitrogen_applied: field
                    .crop_view_items
                    .iter()
                    .map(|i| i.nitrogen_fertilizer_rate * i.area)
                    .sum(),
                manure_nitrogen_applied: field
                    .crop_view_items
                    .iter()
                    .map(CropViewItem::total_manure_nitrogen_applied)
                    .sum(),
            })
            .collect())
    }

    fn calculate_mineral_n2o_emissions_for_farm(
        &self,
        farm: &Farm,
        results: &FarmEmissionResults,
    ) -> Result<NitrousOxideResults> {
        let fertilizer: f64 = results
            .field_component_emission_results
            .iter()
            .map(|r| r.fertilizer_nitrogen_applied)
            .sum();
        Ok(soil_n2o(fertilizer, &farm.defaults))
    }

    /// Storage emissions from the animal results plus emissions from manure spread on fields.
    fn calculate_manure_n2o_emissions_for_farm(
        &self,
        farm: &Farm,
        results: &FarmEmissionResults,
    ) -> Result<NitrousOxideResults> {
        let spread: f64 = results
            .field_component_emission_results
            .iter()
            .map(|r| r.manure_nitrogen_applied)
            .sum();
        let from_land = soil_n2o(spread, &farm.defaults);

        let (storage_direct, storage_indirect) = results
            .animal_component_emissions_results
            .iter()
            .fold((0.0, 0.0), |(direct, indirect), component| {
                (
                    direct + component.total_manure_direct_n2o(),
                    indirect + component.total_manure_indirect_n2o(),
                )
            });

        Ok(NitrousOxideResults {
            direct_n2o: storage_direct + from_land.direct_n2o,
            indirect_n2o: storage_indirect + from_land.indirect_n2o,
        })
    }

    fn calculate_final_results(
        &self,
        farm: &Farm,
        _results: &FarmEmissionResults,
    ) -> Result<Vec<FinalFieldResult>> {
        let mut final_results = Vec::new();
        for field in farm.field_components() {
            for item in &field.crop_view_items {
                final_results.push(FinalFieldResult {
                    field_guid: field.guid,
                    field_name: field.name.clone(),
                    year: item.year,
                    crop_type: item.crop_type,
                    area: item.area,
                    total_carbon_uptake_by_grazing_animals: item.total_carbon_uptake_by_grazing_animals,
                    manure_nitrogen_applied: item.total_manure_nitrogen_applied(),
                    fertilizer_nitrogen_applied: item.nitrogen_fertilizer_rate * item.area,
                    residue_nitrogen: (item.above_ground_residue_nitrogen
                        + item.below_ground_residue_nitrogen)
                        * item.area,
                    cropping_energy_emissions: cropping_energy_emissions(item, &farm.defaults),
                });
            }
        }
        Ok(final_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::CropType;
    use crate::domain::model::{Component, FieldSystemComponent};
    use approx::assert_abs_diff_eq;

    fn farm_with_item(item: CropViewItem) -> Farm {
        let mut farm = Farm::new("Fields", 1);
        let mut field = FieldSystemComponent::new("South");
        field.crop_view_items.push(item);
        farm.components.push(Component::Field(field));
        farm
    }

    #[test]
    fn test_energy_scales_with_area() {
        let mut item = CropViewItem::new(2021, CropType::Wheat);
        item.area = 10.0;
        item.fuel_energy = 2.0;
        item.herbicide_energy = 0.5;

        let energy = cropping_energy_emissions(&item, &Defaults::default());
        assert_abs_diff_eq!(energy, (2.0 * 70.0 + 0.5 * 5.8) * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mineral_n2o_from_fertilizer() {
        let mut item = CropViewItem::new(2021, CropType::Canola);
        item.area = 2.0;
        item.nitrogen_fertilizer_rate = 50.0;
        let farm = farm_with_item(item);
        let service = ReferenceFieldResultsService;

        let mut results = FarmEmissionResults::new(&farm);
        results.field_component_emission_results =
            service.calculate_results_for_field_components(&farm).unwrap();
        let n2o = service
            .calculate_mineral_n2o_emissions_for_farm(&farm, &results)
            .unwrap();

        assert_abs_diff_eq!(n2o.direct_n2o, 100.0 * 0.01 * 44.0 / 28.0, epsilon = 1e-9);
        assert!(n2o.indirect_n2o > 0.0);
    }

    #[test]
    fn test_final_results_carry_grazing_uptake() {
        let mut item = CropViewItem::new(2022, CropType::TameGrass);
        item.total_carbon_uptake_by_grazing_animals = 25.0;
        let farm = farm_with_item(item);

        let final_results = ReferenceFieldResultsService
            .calculate_final_results(&farm, &FarmEmissionResults::new(&farm))
            .unwrap();

        assert_eq!(final_results.len(), 1);
        assert_eq!(final_results[0].total_carbon_uptake_by_grazing_animals, 25.0);
        assert_eq!(final_results[0].year, 2022);
    }
}
