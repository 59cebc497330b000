use serde::Deserialize;
use std::io::Read;

use crate::domain::enums::{CropGroup, CropType, Province, SoilFunctionalCategory, TillageType};
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/fuel_energy_estimates.csv");

/// Table 50: fuel and herbicide energy (GJ ha^-1) for field operations.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FuelEnergyEstimatesData {
    pub province: Province,
    pub soil_functional_category: SoilFunctionalCategory,
    pub tillage_type: TillageType,
    pub crop_group: CropGroup,
    pub fuel_energy: f64,
    pub herbicide_energy: f64,
}

#[derive(Debug, Clone)]
pub struct FuelEnergyEstimatesProvider {
    data: Vec<FuelEnergyEstimatesData>,
}

impl FuelEnergyEstimatesProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            data: read_table(reader)?,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    pub fn get_fuel_energy_estimates_data_instance(
        &self,
        province: Province,
        soil_functional_category: SoilFunctionalCategory,
        tillage_type: TillageType,
        crop_type: CropType,
    ) -> Option<&FuelEnergyEstimatesData> {
        let crop_group = crop_type.crop_group();
        self.data.iter().find(|d| {
            d.province == province
                && d.soil_functional_category == soil_functional_category
                && d.tillage_type == tillage_type
                && d.crop_group == crop_group
        })
    }
}
