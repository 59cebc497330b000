use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::domain::enums::{AnimalType, BeddingMaterialType};
use crate::domain::model::find_bedding_material_composition;
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/bedding_composition.csv");

/// Table 30: bedding material composition per kg of dry matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeddingMaterialCompositionData {
    pub bedding_material_type: BeddingMaterialType,
    pub animal_type: AnimalType,
    pub total_nitrogen_kilograms_dry_matter: f64,
    pub total_carbon_kilograms_dry_matter: f64,
    pub total_phosphorus_kilograms_dry_matter: f64,
    /// %
    pub moisture_content: f64,
}

#[derive(Debug, Clone)]
pub struct BeddingMaterialCompositionProvider {
    data: Vec<BeddingMaterialCompositionData>,
}

impl BeddingMaterialCompositionProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            data: read_table(reader)?,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    pub fn data(&self) -> &[BeddingMaterialCompositionData] {
        &self.data
    }

    pub fn get_row(
        &self,
        bedding_material_type: BeddingMaterialType,
        animal_type: AnimalType,
    ) -> Option<&BeddingMaterialCompositionData> {
        find_bedding_material_composition(&self.data, bedding_material_type, animal_type)
    }
}
