use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::core::uncertainty::ExpressionOfUncertaintyCalculator;
use crate::domain::enums::{AnimalType, ComponentCategory, CropType, HousingType};
use crate::domain::model::Farm;

/// One month of one animal group's management period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupEmissionsByMonth {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub management_period_guid: Uuid,
    pub housing_type: HousingType,
    /// kg N
    pub monthly_organic_nitrogen_available_for_land_application: f64,
    /// kg TAN
    pub monthly_tan_available_for_land_application: f64,
    /// kg N
    pub monthly_nitrogen_available_for_land_application: f64,
    /// kg C
    pub total_amount_of_carbon_in_stored_manure: f64,
    /// kg C taken up by the animals while grazing
    pub total_carbon_uptake: f64,
    /// kg CH4
    pub monthly_manure_methane_emission: f64,
    /// kg N2O
    pub monthly_manure_direct_n2o_emission: f64,
    /// kg N2O
    pub monthly_manure_indirect_n2o_emission: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalGroupEmissionResults {
    pub animal_group_guid: Uuid,
    pub group_name: String,
    pub group_type: AnimalType,
    pub group_emissions_by_month: Vec<GroupEmissionsByMonth>,
}

impl AnimalGroupEmissionResults {
    pub fn total_carbon_uptake_by_animals(&self) -> f64 {
        self.group_emissions_by_month
            .iter()
            .map(|m| m.total_carbon_uptake)
            .sum()
    }

    pub fn total_manure_methane(&self) -> f64 {
        self.group_emissions_by_month
            .iter()
            .map(|m| m.monthly_manure_methane_emission)
            .sum()
    }

    pub fn total_manure_direct_n2o(&self) -> f64 {
        self.group_emissions_by_month
            .iter()
            .map(|m| m.monthly_manure_direct_n2o_emission)
            .sum()
    }

    pub fn total_manure_indirect_n2o(&self) -> f64 {
        self.group_emissions_by_month
            .iter()
            .map(|m| m.monthly_manure_indirect_n2o_emission)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalComponentEmissionsResults {
    pub component_guid: Uuid,
    pub component_name: String,
    pub category: ComponentCategory,
    pub emission_results_for_all_animal_groups_in_component: Vec<AnimalGroupEmissionResults>,
    /// kg CO2
    pub total_carbon_dioxide_emissions_from_manure_spreading: f64,
}

impl AnimalComponentEmissionsResults {
    pub fn total_manure_methane(&self) -> f64 {
        self.emission_results_for_all_animal_groups_in_component
            .iter()
            .map(AnimalGroupEmissionResults::total_manure_methane)
            .sum()
    }

    pub fn total_manure_direct_n2o(&self) -> f64 {
        self.emission_results_for_all_animal_groups_in_component
            .iter()
            .map(AnimalGroupEmissionResults::total_manure_direct_n2o)
            .sum()
    }

    pub fn total_manure_indirect_n2o(&self) -> f64 {
        self.emission_results_for_all_animal_groups_in_component
            .iter()
            .map(AnimalGroupEmissionResults::total_manure_indirect_n2o)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComponentEmissionResults {
    pub component_guid: Uuid,
    pub component_name: String,
    /// kg CO2 from fuel and herbicide energy
    pub cropping_energy_emissions: f64,
    /// kg N
    pub fertilizer_nitrogen_applied: f64,
    /// kg N
    pub manure_nitrogen_applied: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NitrousOxideResults {
    /// kg N2O
    pub direct_n2o: f64,
    /// kg N2O
    pub indirect_n2o: f64,
}

impl NitrousOxideResults {
    pub fn total(&self) -> f64 {
        self.direct_n2o + self.indirect_n2o
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalFieldResult {
    pub field_guid: Uuid,
    pub field_name: String,
    pub year: i32,
    pub crop_type: CropType,
    pub area: f64,
    /// kg C
    pub total_carbon_uptake_by_grazing_animals: f64,
    /// kg N
    pub manure_nitrogen_applied: f64,
    /// kg N
    pub fertilizer_nitrogen_applied: f64,
    /// kg N
    pub residue_nitrogen: f64,
    /// kg CO2
    pub cropping_energy_emissions: f64,
}

/// Accounting tank for the manure of one animal category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManureTank {
    pub animal_type: AnimalType,
    pub total_organic_nitrogen_available_for_land_application: f64,
    pub total_tan_available_for_land_application: f64,
    pub total_amount_of_carbon_in_stored_manure: f64,
    /// Baseline before any field application.
    pub total_available_manure_nitrogen_available_for_land_application: f64,
    pub total_available_manure_nitrogen_available_for_land_application_after_all_land_applications:
        f64,
    /// Debit ledger of user-defined applications.
    pub nitrogen_sum_of_all_manure_applications_made: f64,
}

impl ManureTank {
    pub fn new(animal_type: AnimalType) -> Self {
        Self {
            animal_type,
            total_organic_nitrogen_available_for_land_application: 0.0,
            total_tan_available_for_land_application: 0.0,
            total_amount_of_carbon_in_stored_manure: 0.0,
            total_available_manure_nitrogen_available_for_land_application: 0.0,
            total_available_manure_nitrogen_available_for_land_application_after_all_land_applications: 0.0,
            nitrogen_sum_of_all_manure_applications_made: 0.0,
        }
    }

    pub fn holds(&self, animal_type: AnimalType) -> bool {
        animal_type.category_type() == Some(self.animal_type)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FarmEnergyResults {
    /// kg CO2
    pub energy_carbon_dioxide_from_manure_application: f64,
    /// kg CO2
    pub total_cropping_energy_emissions_for_farm: f64,
}

impl FarmEnergyResults {
    pub fn total_energy_carbon_dioxide(&self) -> f64 {
        self.energy_carbon_dioxide_from_manure_application
            + self.total_cropping_energy_emissions_for_farm
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicResultViewItem {
    pub field_guid: Uuid,
    pub field_name: String,
    pub year: i32,
    pub crop_type: CropType,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

pub fn total_carbon_dioxide_emissions_from_manure_spreading(
    results: &[AnimalComponentEmissionsResults],
) -> f64 {
    results
        .iter()
        .map(|r| r.total_carbon_dioxide_emissions_from_manure_spreading)
        .sum()
}

pub fn total_cropping_energy_emissions(results: &[FieldComponentEmissionResults]) -> f64 {
    results.iter().map(|r| r.cropping_energy_emissions).sum()
}

/// 農場計算結果，與產生它的農場一對一，也是快取的值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmEmissionResults {
    pub farm_guid: Uuid,
    pub farm_name: String,
    pub field_component_emission_results: Vec<FieldComponentEmissionResults>,
    pub animal_component_emissions_results: Vec<AnimalComponentEmissionsResults>,
    pub mineral_n2o_emissions_results: NitrousOxideResults,
    pub manure_n2o_emission_results: NitrousOxideResults,
    pub final_field_result_view_items: Vec<FinalFieldResult>,
    pub manure_tanks: Vec<ManureTank>,
    pub farm_energy_results: FarmEnergyResults,
    pub economic_results_view_items: Vec<EconomicResultViewItem>,
    pub economics_profit: f64,
}

impl FarmEmissionResults {
    /// Empty results with one tank per animal category.
    pub fn new(farm: &Farm) -> Self {
        Self {
            farm_guid: farm.guid,
            farm_name: farm.name.clone(),
            field_component_emission_results: Vec::new(),
            animal_component_emissions_results: Vec::new(),
            mineral_n2o_emissions_results: NitrousOxideResults::default(),
            manure_n2o_emission_results: NitrousOxideResults::default(),
            final_field_result_view_items: Vec::new(),
            manure_tanks: ComponentCategory::ANIMAL_CATEGORIES
                .iter()
                .filter_map(|c| c.animal_type())
                .map(ManureTank::new)
                .collect(),
            farm_energy_results: FarmEnergyResults::default(),
            economic_results_view_items: Vec::new(),
            economics_profit: 0.0,
        }
    }

    pub fn get_manure_tank_by_animal_type(&self, animal_type: AnimalType) -> Option<&ManureTank> {
        self.manure_tanks.iter().find(|t| t.holds(animal_type))
    }

    pub fn get_manure_tank_by_animal_type_mut(
        &mut self,
        animal_type: AnimalType,
    ) -> Option<&mut ManureTank> {
        self.manure_tanks.iter_mut().find(|t| t.holds(animal_type))
    }

    pub fn animal_results_by_category(
        &self,
        category: ComponentCategory,
    ) -> Vec<&AnimalComponentEmissionsResults> {
        self.animal_component_emissions_results
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    pub fn total_manure_methane(&self) -> f64 {
        self.animal_component_emissions_results
            .iter()
            .map(AnimalComponentEmissionsResults::total_manure_methane)
            .sum()
    }

    /// Combined relative uncertainty (%) of the farm's CO2-equivalent estimate.
    pub fn uncertainty_of_net_farm_emissions(&self) -> f64 {
        let calculator = ExpressionOfUncertaintyCalculator::default();
        let co2e = |n2o: f64| n2o * ExpressionOfUncertaintyCalculator::N2O_GLOBAL_WARMING_POTENTIAL;

        let estimates = [
            (
                self.total_manure_methane()
                    * ExpressionOfUncertaintyCalculator::CH4_GLOBAL_WARMING_POTENTIAL,
                calculator.manure_methane_uncertainty(),
            ),
            (
                co2e(self.manure_n2o_emission_results.direct_n2o),
                calculator.manure_direct_nitrous_oxide_uncertainty(),
            ),
            (
                co2e(self.manure_n2o_emission_results.indirect_n2o),
                calculator.manure_indirect_nitrous_oxide_uncertainty(),
            ),
            (
                self.farm_energy_results.total_energy_carbon_dioxide(),
                calculator.energy_carbon_dioxide_uncertainty(),
            ),
        ];

        calculator.calculate_uncertainty_associated_with_net_farm_emission_estimate(&estimates)
    }
}

impl fmt::Display for FarmEmissionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manure_n_applied: f64 = self
            .manure_tanks
            .iter()
            .map(|t| t.nitrogen_sum_of_all_manure_applications_made)
            .sum();

        write!(
            f,
            "fields: {}, animal components: {}, field-years: {}, manure CH4: {:.2} kg, \
             mineral N2O: {:.2} kg, manure N2O: {:.2} kg, energy CO2: {:.2} kg, \
             manure N applied: {:.2} kg, profit: ${:.2}, uncertainty: {:.1}%",
            self.field_component_emission_results.len(),
            self.animal_component_emissions_results.len(),
            self.final_field_result_view_items.len(),
            self.total_manure_methane(),
            self.mineral_n2o_emissions_results.total(),
            self.manure_n2o_emission_results.total(),
            self.farm_energy_results.total_energy_carbon_dioxide(),
            manure_n_applied,
            self.economics_profit,
            self.uncertainty_of_net_farm_emissions(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_results_have_one_tank_per_category() {
        let farm = Farm::new("Tanks", 100);
        let results = FarmEmissionResults::new(&farm);

        assert_eq!(results.manure_tanks.len(), 6);
        assert_eq!(results.farm_guid, farm.guid);
        assert!(results.get_manure_tank_by_animal_type(AnimalType::DairyLactatingCow).is_some());
        assert_eq!(
            results.get_manure_tank_by_animal_type(AnimalType::Lamb).unwrap().animal_type,
            AnimalType::Sheep
        );
        assert!(results.get_manure_tank_by_animal_type(AnimalType::NotSelected).is_none());
    }

    #[test]
    fn test_group_carbon_uptake_sums_months() {
        let group = AnimalGroupEmissionResults {
            animal_group_guid: Uuid::new_v4(),
            group_name: "Cows".to_string(),
            group_type: AnimalType::BeefCow,
            group_emissions_by_month: vec![
                GroupEmissionsByMonth {
                    total_carbon_uptake: 4.0,
                    ..Default::default()
                },
                GroupEmissionsByMonth {
                    total_carbon_uptake: 6.0,
                    ..Default::default()
                },
            ],
        };

        assert_eq!(group.total_carbon_uptake_by_animals(), 10.0);
    }

    #[test]
    fn test_empty_results_summary_renders() {
        let farm = Farm::new("Summary", 7);
        let summary = FarmEmissionResults::new(&farm).to_string();
        assert!(summary.contains("fields: 0"));
        assert!(summary.contains("uncertainty: 0.0%"));
    }
}
