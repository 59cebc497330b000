use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::enums::{
    AnimalType, BeddingMaterialType, ComponentCategory, CropType, HardinessZone, HousingType,
    ManureLocationSourceType, ManureStateType, Province, SoilFunctionalCategory, TillageType,
};
use crate::providers::bedding::BeddingMaterialCompositionData;
use crate::providers::manure_composition::ManureCompositionData;
use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{
    validate_fraction, validate_non_empty_string, validate_non_negative, Validate,
};

fn new_guid() -> Uuid {
    Uuid::new_v4()
}

fn default_area() -> f64 {
    1.0
}

/// Farm-level default coefficients used by the result calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// kg C per kg dry matter
    pub carbon_concentration: f64,
    /// kg CO2 per GJ of diesel energy
    pub emission_factor_for_diesel: f64,
    /// kg CO2 per GJ of herbicide production energy
    pub emission_factor_for_herbicide: f64,
    pub fertilizer_direct_n2o_emission_factor: f64,
    pub fertilizer_volatilization_fraction: f64,
    pub emission_factor_volatilization: f64,
    pub leaching_fraction: f64,
    pub emission_factor_leaching: f64,
    /// kg CO2 per kg manure nitrogen spread
    pub manure_spreading_co2_per_kg_nitrogen: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            carbon_concentration: 0.45,
            emission_factor_for_diesel: 70.0,
            emission_factor_for_herbicide: 5.8,
            fertilizer_direct_n2o_emission_factor: 0.01,
            fertilizer_volatilization_fraction: 0.11,
            emission_factor_volatilization: 0.01,
            leaching_fraction: 0.21,
            emission_factor_leaching: 0.011,
            manure_spreading_co2_per_kg_nitrogen: 0.25,
        }
    }
}

impl Validate for Defaults {
    fn validate(&self) -> Result<()> {
        validate_fraction("defaults.carbon_concentration", self.carbon_concentration)?;
        validate_fraction(
            "defaults.fertilizer_direct_n2o_emission_factor",
            self.fertilizer_direct_n2o_emission_factor,
        )?;
        validate_fraction(
            "defaults.fertilizer_volatilization_fraction",
            self.fertilizer_volatilization_fraction,
        )?;
        validate_fraction(
            "defaults.emission_factor_volatilization",
            self.emission_factor_volatilization,
        )?;
        validate_fraction("defaults.leaching_fraction", self.leaching_fraction)?;
        validate_fraction("defaults.emission_factor_leaching", self.emission_factor_leaching)?;
        validate_non_negative("defaults.emission_factor_for_diesel", self.emission_factor_for_diesel)?;
        validate_non_negative(
            "defaults.emission_factor_for_herbicide",
            self.emission_factor_for_herbicide,
        )?;
        validate_non_negative(
            "defaults.manure_spreading_co2_per_kg_nitrogen",
            self.manure_spreading_co2_per_kg_nitrogen,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarnTemperatureData {
    pub province: Province,
    /// °C, January first
    pub monthly_temperatures: [f64; 12],
    pub is_initialized: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateData {
    /// mm, January first
    pub monthly_precipitation: [f64; 12],
    /// °C
    pub monthly_temperature: [f64; 12],
    /// mm of potential evapotranspiration
    pub monthly_evapotranspiration: [f64; 12],
    pub barn_temperature_data: Option<BarnTemperatureData>,
}

impl ClimateData {
    pub fn total_annual_precipitation(&self) -> f64 {
        self.monthly_precipitation.iter().sum()
    }

    pub fn mean_annual_temperature(&self) -> f64 {
        self.monthly_temperature.iter().sum::<f64>() / 12.0
    }

    pub fn total_annual_evapotranspiration(&self) -> f64 {
        self.monthly_evapotranspiration.iter().sum()
    }

    pub fn normals(&self) -> ClimateNormals {
        ClimateNormals {
            total_annual_precipitation: self.total_annual_precipitation(),
            mean_annual_temperature: self.mean_annual_temperature(),
            total_annual_evapotranspiration: self.total_annual_evapotranspiration(),
        }
    }
}

/// Annual climate summary the emission-factor lookups are keyed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateNormals {
    pub total_annual_precipitation: f64,
    pub mean_annual_temperature: f64,
    pub total_annual_evapotranspiration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilData {
    pub polygon_id: u32,
    pub ecodistrict_id: u32,
    pub province: Province,
    pub soil_functional_category: SoilFunctionalCategory,
    #[serde(default)]
    pub hardiness_zone: Option<HardinessZone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographicData {
    pub default_soil_data: Option<SoilData>,
    pub soil_data_for_all_components_within_polygon: Vec<SoilData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManureApplicationViewItem {
    pub date_of_application: NaiveDate,
    #[serde(default)]
    pub manure_location_source_type: ManureLocationSourceType,
    pub animal_type: AnimalType,
    #[serde(default)]
    pub manure_state_type: ManureStateType,
    /// kg N ha^-1
    pub amount_of_nitrogen_applied_per_hectare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrazingViewItem {
    pub animal_component_guid: Uuid,
    pub animal_group_guid: Uuid,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropEconomicData {
    /// $ per tonne of harvested yield
    pub price_per_tonne: f64,
    /// $ per hectare
    pub variable_cost_per_hectare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropViewItem {
    #[serde(default = "new_guid")]
    pub guid: Uuid,
    pub year: i32,
    pub crop_type: CropType,
    #[serde(default)]
    pub tillage_type: TillageType,
    /// ha
    #[serde(default = "default_area")]
    pub area: f64,
    /// kg ha^-1
    #[serde(default)]
    pub yield_per_hectare: f64,
    /// kg N ha^-1
    #[serde(default)]
    pub nitrogen_fertilizer_rate: f64,
    #[serde(default)]
    pub above_ground_residue_nitrogen: f64,
    #[serde(default)]
    pub below_ground_residue_nitrogen: f64,
    /// GJ ha^-1
    #[serde(default)]
    pub fuel_energy: f64,
    #[serde(default)]
    pub herbicide_energy: f64,
    #[serde(default)]
    pub manure_application_view_items: Vec<ManureApplicationViewItem>,
    #[serde(default)]
    pub grazing_view_items: Vec<GrazingViewItem>,
    /// Written by the results pipeline.
    #[serde(default)]
    pub total_carbon_uptake_by_grazing_animals: f64,
    #[serde(default)]
    pub crop_economic_data: Option<CropEconomicData>,
}

impl CropViewItem {
    pub fn new(year: i32, crop_type: CropType) -> Self {
        Self {
            guid: new_guid(),
            year,
            crop_type,
            tillage_type: TillageType::default(),
            area: default_area(),
            yield_per_hectare: 0.0,
            nitrogen_fertilizer_rate: 0.0,
            above_ground_residue_nitrogen: 0.0,
            below_ground_residue_nitrogen: 0.0,
            fuel_energy: 0.0,
            herbicide_energy: 0.0,
            manure_application_view_items: Vec::new(),
            grazing_view_items: Vec::new(),
            total_carbon_uptake_by_grazing_animals: 0.0,
            crop_economic_data: None,
        }
    }

    /// kg N applied as manure over the whole area of the field.
    pub fn total_manure_nitrogen_applied(&self) -> f64 {
        self.manure_application_view_items
            .iter()
            .map(|a| a.amount_of_nitrogen_applied_per_hectare * self.area)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSystemComponent {
    #[serde(default = "new_guid")]
    pub guid: Uuid,
    pub name: String,
    #[serde(default)]
    pub crop_view_items: Vec<CropViewItem>,
}

impl FieldSystemComponent {
    pub fn new(name: &str) -> Self {
        Self {
            guid: new_guid(),
            name: name.to_string(),
            crop_view_items: Vec::new(),
        }
    }

    /// The representative view item for the field: the one for the most recent year.
    pub fn get_single_year_view_item(&self) -> Option<&CropViewItem> {
        self.crop_view_items.iter().max_by_key(|item| item.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingDetails {
    pub housing_type: HousingType,
    pub bedding_material_type: BeddingMaterialType,
    /// kg DM head^-1 day^-1
    pub user_defined_bedding_rate: f64,
    pub total_carbon_kilograms_dry_matter_for_bedding: f64,
    pub total_nitrogen_kilograms_dry_matter_for_bedding: f64,
    pub total_phosphorus_kilograms_dry_matter_for_bedding: f64,
    pub moisture_content_of_bedding_material: f64,
}

impl Default for HousingDetails {
    fn default() -> Self {
        Self {
            housing_type: HousingType::HousedInBarn,
            bedding_material_type: BeddingMaterialType::None,
            user_defined_bedding_rate: 0.0,
            total_carbon_kilograms_dry_matter_for_bedding: 0.0,
            total_nitrogen_kilograms_dry_matter_for_bedding: 0.0,
            total_phosphorus_kilograms_dry_matter_for_bedding: 0.0,
            moisture_content_of_bedding_material: 0.0,
        }
    }
}

/// Populated from the default tables by the initialization service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManureDetails {
    pub state_type: ManureStateType,
    pub fraction_of_carbon_in_manure: f64,
    pub fraction_of_nitrogen_in_manure: f64,
    pub fraction_of_phosphorus_in_manure: f64,
    pub fraction_of_organic_nitrogen_immobilized: f64,
    pub fraction_of_organic_nitrogen_nitrified: f64,
    pub fraction_of_organic_nitrogen_mineralized: f64,
    pub methane_conversion_factor: f64,
    pub n2o_direct_emission_factor: f64,
    pub volatilization_fraction: f64,
    pub emission_factor_volatilization: f64,
    pub leaching_fraction: f64,
    pub emission_factor_leaching: f64,
    pub methane_producing_capacity_of_manure: f64,
}

impl Validate for ManureDetails {
    fn validate(&self) -> Result<()> {
        let fractions = [
            ("fraction_of_carbon_in_manure", self.fraction_of_carbon_in_manure),
            ("fraction_of_nitrogen_in_manure", self.fraction_of_nitrogen_in_manure),
            ("fraction_of_phosphorus_in_manure", self.fraction_of_phosphorus_in_manure),
            (
                "fraction_of_organic_nitrogen_immobilized",
                self.fraction_of_organic_nitrogen_immobilized,
            ),
            (
                "fraction_of_organic_nitrogen_nitrified",
                self.fraction_of_organic_nitrogen_nitrified,
            ),
            (
                "fraction_of_organic_nitrogen_mineralized",
                self.fraction_of_organic_nitrogen_mineralized,
            ),
            ("volatilization_fraction", self.volatilization_fraction),
            ("leaching_fraction", self.leaching_fraction),
        ];
        for (name, value) in fractions {
            validate_fraction(&format!("manure_details.{}", name), value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementPeriod {
    #[serde(default = "new_guid")]
    pub guid: Uuid,
    pub name: String,
    pub animal_type: AnimalType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub number_of_animals: f64,
    /// kg N head^-1 day^-1
    #[serde(default)]
    pub nitrogen_excretion_rate: f64,
    /// kg DM head^-1 day^-1
    #[serde(default)]
    pub dry_matter_intake: f64,
    /// kg head^-1 day^-1, lactating dairy cows only
    #[serde(default)]
    pub milk_production: f64,
    #[serde(default)]
    pub housing_details: HousingDetails,
    #[serde(default)]
    pub manure_details: ManureDetails,
}

impl ManagementPeriod {
    pub fn new(name: &str, animal_type: AnimalType, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            guid: new_guid(),
            name: name.to_string(),
            animal_type,
            start,
            end,
            number_of_animals: 0.0,
            nitrogen_excretion_rate: 0.0,
            dry_matter_intake: 0.0,
            milk_production: 0.0,
            housing_details: HousingDetails::default(),
            manure_details: ManureDetails::default(),
        }
    }

    /// Inclusive of both the start and end day.
    pub fn number_of_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl Validate for ManagementPeriod {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("management_period.name", &self.name)?;
        if self.end < self.start {
            return Err(FarmError::ValidationError {
                message: format!(
                    "Management period '{}' ends ({}) before it starts ({})",
                    self.name, self.end, self.start
                ),
            });
        }
        validate_non_negative("management_period.number_of_animals", self.number_of_animals)?;
        self.manure_details.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalGroup {
    #[serde(default = "new_guid")]
    pub guid: Uuid,
    pub name: String,
    pub group_type: AnimalType,
    /// Bounds every management period of the group when set.
    #[serde(default)]
    pub lifetime_start: Option<NaiveDate>,
    #[serde(default)]
    pub lifetime_end: Option<NaiveDate>,
    #[serde(default)]
    pub management_periods: Vec<ManagementPeriod>,
}

impl AnimalGroup {
    pub fn new(name: &str, group_type: AnimalType) -> Self {
        Self {
            guid: new_guid(),
            name: name.to_string(),
            group_type,
            lifetime_start: None,
            lifetime_end: None,
            management_periods: Vec::new(),
        }
    }
}

impl Validate for AnimalGroup {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("animal_group.name", &self.name)?;

        let mut periods: Vec<&ManagementPeriod> = self.management_periods.iter().collect();
        periods.sort_by_key(|p| p.start);

        for period in &periods {
            period.validate()?;

            let starts_too_early = self.lifetime_start.is_some_and(|s| period.start < s);
            let ends_too_late = self.lifetime_end.is_some_and(|e| period.end > e);
            if starts_too_early || ends_too_late {
                return Err(FarmError::ValidationError {
                    message: format!(
                        "Management period '{}' of group '{}' outlives the group",
                        period.name, self.name
                    ),
                });
            }
        }

        for pair in periods.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(FarmError::ValidationError {
                    message: format!(
                        "Management periods '{}' and '{}' of group '{}' overlap",
                        pair[0].name, pair[1].name, self.name
                    ),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalComponent {
    #[serde(default = "new_guid")]
    pub guid: Uuid,
    pub name: String,
    pub category: ComponentCategory,
    #[serde(default)]
    pub groups: Vec<AnimalGroup>,
}

impl AnimalComponent {
    pub fn new(name: &str, category: ComponentCategory) -> Self {
        Self {
            guid: new_guid(),
            name: name.to_string(),
            category,
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Component {
    Field(FieldSystemComponent),
    Animal(AnimalComponent),
}

impl Component {
    pub fn guid(&self) -> Uuid {
        match self {
            Component::Field(field) => field.guid,
            Component::Animal(animal) => animal.guid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Field(field) => &field.name,
            Component::Animal(animal) => &animal.name,
        }
    }

    pub fn category(&self) -> ComponentCategory {
        match self {
            Component::Field(_) => ComponentCategory::LandManagement,
            Component::Animal(animal) => animal.category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSystemDetailsStageState {
    #[serde(default)]
    pub detail_view_items: Vec<CropViewItem>,
}

/// Transient working state of the detail screens; read by initialization, never a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StageState {
    FieldSystemDetails(FieldSystemDetailsStageState),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Farm {
    #[serde(default = "new_guid")]
    pub guid: Uuid,
    /// 執行期識別碼：每次建立或反序列化都會重新產生，不寫入檔案
    #[serde(skip, default = "new_guid")]
    pub instance_id: Uuid,
    pub name: String,
    /// Soil landscape polygon; zero means the farm has no location.
    #[serde(default)]
    pub polygon_id: u32,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub climate_data: ClimateData,
    #[serde(default)]
    pub geographic_data: GeographicData,
    #[serde(default)]
    pub stage_states: Vec<StageState>,
    #[serde(default)]
    pub results_calculated: bool,
    #[serde(default)]
    pub default_manure_composition_data: Vec<ManureCompositionData>,
    #[serde(default)]
    pub default_bedding_composition_data: Vec<BeddingMaterialCompositionData>,
}

impl Farm {
    pub fn new(name: &str, polygon_id: u32) -> Self {
        Self {
            guid: new_guid(),
            instance_id: new_guid(),
            name: name.to_string(),
            polygon_id,
            components: Vec::new(),
            defaults: Defaults::default(),
            climate_data: ClimateData::default(),
            geographic_data: GeographicData::default(),
            stage_states: Vec::new(),
            results_calculated: false,
            default_manure_composition_data: Vec::new(),
            default_bedding_composition_data: Vec::new(),
        }
    }

    /// Any edit to the farm must go through here so cached results are recomputed.
    pub fn mark_modified(&mut self) {
        self.results_calculated = false;
    }

    pub fn field_components(&self) -> impl Iterator<Item = &FieldSystemComponent> {
        self.components.iter().filter_map(|c| match c {
            Component::Field(field) => Some(field),
            Component::Animal(_) => None,
        })
    }

    pub fn field_components_mut(&mut self) -> impl Iterator<Item = &mut FieldSystemComponent> {
        self.components.iter_mut().filter_map(|c| match c {
            Component::Field(field) => Some(field),
            Component::Animal(_) => None,
        })
    }

    pub fn animal_components(&self) -> impl Iterator<Item = &AnimalComponent> {
        self.components.iter().filter_map(|c| match c {
            Component::Animal(animal) => Some(animal),
            Component::Field(_) => None,
        })
    }

    pub fn animal_components_mut(&mut self) -> impl Iterator<Item = &mut AnimalComponent> {
        self.components.iter_mut().filter_map(|c| match c {
            Component::Animal(animal) => Some(animal),
            Component::Field(_) => None,
        })
    }

    pub fn animal_components_by_category(
        &self,
        category: ComponentCategory,
    ) -> Vec<&AnimalComponent> {
        self.animal_components()
            .filter(|a| a.category == category)
            .collect()
    }

    /// Field view items together with the detail-screen items held in stage states.
    pub fn crop_view_items_mut(&mut self) -> Vec<&mut CropViewItem> {
        let Farm {
            components,
            stage_states,
            ..
        } = self;

        let field_items = components
            .iter_mut()
            .filter_map(|c| match c {
                Component::Field(field) => Some(field),
                Component::Animal(_) => None,
            })
            .flat_map(|field| field.crop_view_items.iter_mut());
        let detail_items = stage_states.iter_mut().flat_map(|s| match s {
            StageState::FieldSystemDetails(state) => state.detail_view_items.iter_mut(),
        });

        field_items.chain(detail_items).collect()
    }

    pub fn default_soil_data(&self) -> Option<&SoilData> {
        self.geographic_data.default_soil_data.as_ref()
    }

    pub fn province(&self) -> Option<Province> {
        self.default_soil_data().map(|s| s.province)
    }

    pub fn bedding_material_composition(
        &self,
        bedding_material_type: BeddingMaterialType,
        animal_type: AnimalType,
    ) -> Option<&BeddingMaterialCompositionData> {
        find_bedding_material_composition(
            &self.default_bedding_composition_data,
            bedding_material_type,
            animal_type,
        )
    }
}

/// Exact animal type first, then the category-level type.
pub fn find_bedding_material_composition(
    data: &[BeddingMaterialCompositionData],
    bedding_material_type: BeddingMaterialType,
    animal_type: AnimalType,
) -> Option<&BeddingMaterialCompositionData> {
    let find = |t: AnimalType| {
        data.iter()
            .find(|d| d.bedding_material_type == bedding_material_type && d.animal_type == t)
    };

    find(animal_type).or_else(|| find(animal_type.category_type()?))
}

impl Validate for Farm {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("farm.name", &self.name)?;
        self.defaults.validate()?;

        for component in &self.components {
            validate_non_empty_string("component.name", component.name())?;
            match component {
                Component::Animal(animal) => {
                    for group in &animal.groups {
                        group.validate()?;
                    }
                }
                Component::Field(field) => {
                    for item in &field.crop_view_items {
                        validate_non_negative("crop_view_item.area", item.area)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_climate_normals() {
        let mut climate = ClimateData::default();
        climate.monthly_precipitation = [30.0; 12];
        climate.monthly_temperature = [6.0; 12];
        climate.monthly_evapotranspiration = [50.0; 12];

        let normals = climate.normals();
        assert_eq!(normals.total_annual_precipitation, 360.0);
        assert_eq!(normals.mean_annual_temperature, 6.0);
        assert_eq!(normals.total_annual_evapotranspiration, 600.0);
    }

    #[test]
    fn test_single_year_view_item_is_latest_year() {
        let mut field = FieldSystemComponent::new("North");
        field.crop_view_items.push(CropViewItem::new(2019, CropType::Wheat));
        field.crop_view_items.push(CropViewItem::new(2021, CropType::Canola));
        field.crop_view_items.push(CropViewItem::new(2020, CropType::Barley));

        let item = field.get_single_year_view_item().unwrap();
        assert_eq!(item.year, 2021);
        assert_eq!(item.crop_type, CropType::Canola);

        assert!(FieldSystemComponent::new("Empty").get_single_year_view_item().is_none());
    }

    #[test]
    fn test_overlapping_management_periods_are_rejected() {
        let mut group = AnimalGroup::new("Cows", AnimalType::BeefCow);
        group.management_periods.push(ManagementPeriod::new(
            "Winter",
            AnimalType::BeefCow,
            date(2020, 1, 1),
            date(2020, 4, 30),
        ));
        group.management_periods.push(ManagementPeriod::new(
            "Summer",
            AnimalType::BeefCow,
            date(2020, 4, 15),
            date(2020, 9, 30),
        ));

        assert!(matches!(group.validate(), Err(FarmError::ValidationError { .. })));

        group.management_periods[1].start = date(2020, 5, 1);
        assert!(group.validate().is_ok());
    }

    #[test]
    fn test_period_outliving_group_is_rejected() {
        let mut group = AnimalGroup::new("Calves", AnimalType::BeefCalf);
        group.lifetime_start = Some(date(2020, 3, 1));
        group.lifetime_end = Some(date(2020, 10, 31));
        group.management_periods.push(ManagementPeriod::new(
            "Pasture",
            AnimalType::BeefCalf,
            date(2020, 5, 1),
            date(2020, 11, 15),
        ));

        assert!(group.validate().is_err());
    }

    #[test]
    fn test_mineralization_fractions_must_be_fractions() {
        let mut details = ManureDetails::default();
        details.fraction_of_organic_nitrogen_mineralized = 1.2;
        assert!(details.validate().is_err());
    }

    #[test]
    fn test_crop_view_items_include_stage_states() {
        let mut farm = Farm::new("Test", 1);
        let mut field = FieldSystemComponent::new("Field");
        field.crop_view_items.push(CropViewItem::new(2020, CropType::Wheat));
        farm.components.push(Component::Field(field));
        farm.stage_states.push(StageState::FieldSystemDetails(FieldSystemDetailsStageState {
            detail_view_items: vec![CropViewItem::new(2020, CropType::Barley)],
        }));

        assert_eq!(farm.crop_view_items_mut().len(), 2);
    }

    #[test]
    fn test_number_of_days_is_inclusive() {
        let period = ManagementPeriod::new("Jan", AnimalType::Ewe, date(2020, 1, 1), date(2020, 1, 31));
        assert_eq!(period.number_of_days(), 31);
    }
}
