use serde::Deserialize;
use std::io::Read;

use crate::domain::enums::{AnimalType, ManureStateType};
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/mineralization_fractions.csv");

/// Table 44: fate of organic nitrogen during storage.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MineralizationFractionData {
    pub manure_state_type: ManureStateType,
    pub animal_type: AnimalType,
    pub fraction_immobilized: f64,
    pub fraction_nitrified: f64,
    pub fraction_mineralized: f64,
}

#[derive(Debug, Clone)]
pub struct MineralizationFractionProvider {
    data: Vec<MineralizationFractionData>,
}

impl MineralizationFractionProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            data: read_table(reader)?,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    pub fn get_by_storage_type(
        &self,
        manure_state_type: ManureStateType,
        animal_type: AnimalType,
    ) -> Option<&MineralizationFractionData> {
        let find = |t: AnimalType| {
            self.data
                .iter()
                .find(|d| d.manure_state_type == manure_state_type && d.animal_type == t)
        };

        find(animal_type).or_else(|| find(animal_type.category_type()?))
    }
}
