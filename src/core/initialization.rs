use std::sync::Arc;

use chrono::Datelike;

use crate::domain::enums::{AnimalType, ComponentCategory};
use crate::domain::model::{find_bedding_material_composition, Component, Farm, ManagementPeriod};
use crate::providers::bedding::BeddingMaterialCompositionData;
use crate::providers::manure_composition::ManureCompositionData;
use crate::providers::mineralization::MineralizationFractionData;
use crate::providers::DefaultDataTables;
use crate::utils::error::{FarmError, Result};

/// 將預設資料表的值寫入農場的管理期間與作物項目
///
/// Every operation overwrites values from the current tables, so running it again on an
/// unchanged farm leaves the farm unchanged. Missing inputs leave the prior value in
/// place; only missing milk production coverage is an error.
#[derive(Debug, Clone)]
pub struct InitializationService {
    tables: Arc<DefaultDataTables>,
}

impl InitializationService {
    pub fn new(tables: Arc<DefaultDataTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Arc<DefaultDataTables> {
        &self.tables
    }

    /// Initializes barn temperature once soil and climate data exist.
    pub fn check_initialization(&self, farm: &mut Farm) {
        if farm.default_soil_data().is_none() {
            return;
        }

        let initialized = farm
            .climate_data
            .barn_temperature_data
            .as_ref()
            .is_some_and(|b| b.is_initialized);
        if !initialized {
            self.initialize_barn_temperature(farm);
        }
    }

    pub fn re_initialize_farms(&self, farms: &mut [Farm]) -> Result<()> {
        for farm in farms.iter_mut() {
            self.re_initialize_farm(farm)?;
        }
        Ok(())
    }

    pub fn re_initialize_farm(&self, farm: &mut Farm) -> Result<()> {
        tracing::debug!("🔄 Re-initializing defaults for farm '{}'", farm.name);

        self.initialize_manure_composition_data(farm);
        self.initialize_milk_production(farm)?;
        self.initialize_methane_producing_capacity(farm);
        self.initialize_default_emission_factors(farm);
        self.initialize_manure_mineralization_fractions(farm);
        self.initialize_fuel_energy(farm);
        self.initialize_barn_temperature(farm);

        farm.mark_modified();
        Ok(())
    }

    /// Table 6. Also refreshes the farm's own copy of the composition table.
    pub fn initialize_manure_composition_data(&self, farm: &mut Farm) {
        let provider = &self.tables.manure_composition;
        farm.default_manure_composition_data = provider.data().to_vec();

        for component in farm.animal_components_mut() {
            for group in &mut component.groups {
                let group_type = group.group_type;
                for period in &mut group.management_periods {
                    let defaults = provider.get_manure_composition_data_by_type(
                        group_type,
                        period.manure_details.state_type,
                    );
                    apply_manure_composition(period, defaults);
                }
            }
        }
    }

    /// Table 21, lactating dairy cows only.
    pub fn initialize_milk_production(&self, farm: &mut Farm) -> Result<()> {
        let province = farm.province();

        for component in farm.animal_components_mut() {
            if component.category != ComponentCategory::Dairy {
                continue;
            }

            for group in &mut component.groups {
                if group.group_type != AnimalType::DairyLactatingCow {
                    continue;
                }

                for period in &mut group.management_periods {
                    let year = period.start.year();
                    let milk_production = province.and_then(|p| {
                        self.tables.milk_production.get_average_milk_production(p, year)
                    });

                    period.milk_production = milk_production.ok_or_else(|| {
                        let province = province
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| "unknown province".to_string());
                        FarmError::missing_reference(
                            "average milk production",
                            format!("{} {}", province, year),
                        )
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Table 35.
    pub fn initialize_methane_producing_capacity(&self, farm: &mut Farm) {
        let provider = &self.tables.methane_capacity;

        for period in management_periods_mut(farm) {
            if let Some(capacity) = provider.get_methane_producing_capacity_of_manure(period.animal_type) {
                period.manure_details.methane_producing_capacity_of_manure = capacity;
            }
        }
    }

    /// Table 36. Climate normals are derived from the farm's monthly data first.
    pub fn initialize_default_emission_factors(&self, farm: &mut Farm) {
        let normals = farm.climate_data.normals();
        let provider = &self.tables.emission_factors;

        for component in farm.animal_components_mut() {
            let category = component.category;
            for group in &mut component.groups {
                for period in &mut group.management_periods {
                    let Some(factors) =
                        provider.get_factors(period.manure_details.state_type, category, &normals)
                    else {
                        continue;
                    };

                    let details = &mut period.manure_details;
                    details.methane_conversion_factor = factors.methane_conversion_factor;
                    details.n2o_direct_emission_factor = factors.n2o_direct_emission_factor;
                    details.volatilization_fraction = factors.volatilization_fraction;
                    details.emission_factor_volatilization = factors.emission_factor_volatilization;
                    details.leaching_fraction = factors.leaching_fraction;
                    details.emission_factor_leaching = factors.emission_factor_leach;
                }
            }
        }
    }

    /// Table 44.
    pub fn initialize_manure_mineralization_fractions(&self, farm: &mut Farm) {
        let provider = &self.tables.mineralization;

        for period in management_periods_mut(farm) {
            let fractions =
                provider.get_by_storage_type(period.manure_details.state_type, period.animal_type);
            apply_mineralization_fractions(period, fractions);
        }
    }

    /// Table 50, for field view items and detail-screen items alike.
    pub fn initialize_fuel_energy(&self, farm: &mut Farm) {
        let Some(soil) = farm.default_soil_data().cloned() else {
            return;
        };
        let provider = &self.tables.fuel_energy;

        for view_item in farm.crop_view_items_mut() {
            if let Some(estimates) = provider.get_fuel_energy_estimates_data_instance(
                soil.province,
                soil.soil_functional_category,
                view_item.tillage_type,
                view_item.crop_type,
            ) {
                view_item.fuel_energy = estimates.fuel_energy;
                view_item.herbicide_energy = estimates.herbicide_energy;
            }
        }
    }

    /// Table 63. Always resets; `check_initialization` guards the one-time path.
    pub fn initialize_barn_temperature(&self, farm: &mut Farm) {
        let Some(province) = farm.province() else {
            return;
        };

        if let Some(mut barn) = self.tables.indoor_temperature.get_indoor_temperature(province) {
            barn.is_initialized = true;
            farm.climate_data.barn_temperature_data = Some(barn);
        }
    }

    /// Table 30. Refreshes the farm's bedding list, then each period's housing details.
    pub fn reinitialize_bedding_material(&self, farm: &mut Farm) {
        farm.default_bedding_composition_data = self.tables.bedding.data().to_vec();

        let Farm {
            components,
            default_bedding_composition_data,
            ..
        } = farm;

        for component in components.iter_mut() {
            let Component::Animal(animal) = component else {
                continue;
            };
            for group in &mut animal.groups {
                for period in &mut group.management_periods {
                    let composition = find_bedding_material_composition(
                        default_bedding_composition_data,
                        period.housing_details.bedding_material_type,
                        period.animal_type,
                    );
                    apply_bedding_material(period, composition);
                }
            }
        }
    }
}

fn management_periods_mut(farm: &mut Farm) -> impl Iterator<Item = &mut ManagementPeriod> {
    farm.animal_components_mut()
        .flat_map(|c| c.groups.iter_mut())
        .flat_map(|g| g.management_periods.iter_mut())
}

fn apply_manure_composition(period: &mut ManagementPeriod, data: Option<&ManureCompositionData>) {
    if let Some(data) = data {
        let details = &mut period.manure_details;
        details.fraction_of_phosphorus_in_manure = data.phosphorus_fraction;
        details.fraction_of_carbon_in_manure = data.carbon_fraction;
        details.fraction_of_nitrogen_in_manure = data.nitrogen_fraction;
    }
}

fn apply_mineralization_fractions(
    period: &mut ManagementPeriod,
    fractions: Option<&MineralizationFractionData>,
) {
    if let Some(fractions) = fractions {
        let details = &mut period.manure_details;
        details.fraction_of_organic_nitrogen_immobilized = fractions.fraction_immobilized;
        details.fraction_of_organic_nitrogen_nitrified = fractions.fraction_nitrified;
        details.fraction_of_organic_nitrogen_mineralized = fractions.fraction_mineralized;
    }
}

fn apply_bedding_material(period: &mut ManagementPeriod, data: Option<&BeddingMaterialCompositionData>) {
    if let Some(data) = data {
        let housing = &mut period.housing_details;
        housing.total_carbon_kilograms_dry_matter_for_bedding = data.total_carbon_kilograms_dry_matter;
        housing.total_nitrogen_kilograms_dry_matter_for_bedding = data.total_nitrogen_kilograms_dry_matter;
        housing.total_phosphorus_kilograms_dry_matter_for_bedding =
            data.total_phosphorus_kilograms_dry_matter;
        housing.moisture_content_of_bedding_material = data.moisture_content;
    }
}
