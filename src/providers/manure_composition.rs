use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::domain::enums::{AnimalType, ManureStateType};
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/manure_composition.csv");

/// Table 6: manure composition by animal type and storage state (fractions, wet basis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManureCompositionData {
    pub animal_type: AnimalType,
    pub manure_state_type: ManureStateType,
    /// %
    pub moisture_content: f64,
    pub nitrogen_fraction: f64,
    pub carbon_fraction: f64,
    pub phosphorus_fraction: f64,
}

#[derive(Debug, Clone)]
pub struct ManureCompositionProvider {
    data: Vec<ManureCompositionData>,
}

impl ManureCompositionProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            data: read_table(reader)?,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    pub fn data(&self) -> &[ManureCompositionData] {
        &self.data
    }

    /// Exact animal type first, then the category-level type.
    pub fn get_manure_composition_data_by_type(
        &self,
        animal_type: AnimalType,
        manure_state_type: ManureStateType,
    ) -> Option<&ManureCompositionData> {
        let find = |t: AnimalType| {
            self.data
                .iter()
                .find(|d| d.animal_type == t && d.manure_state_type == manure_state_type)
        };

        find(animal_type).or_else(|| find(animal_type.category_type()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_type_falls_back_to_category() {
        let provider = ManureCompositionProvider::builtin().unwrap();

        let data = provider
            .get_manure_composition_data_by_type(
                AnimalType::DairyLactatingCow,
                ManureStateType::LiquidNoCrust,
            )
            .unwrap();
        assert_eq!(data.animal_type, AnimalType::Dairy);
        assert!(data.nitrogen_fraction > 0.0);
    }

    #[test]
    fn test_unknown_state_is_none() {
        let provider = ManureCompositionProvider::builtin().unwrap();
        assert!(provider
            .get_manure_composition_data_by_type(AnimalType::Ewe, ManureStateType::AnaerobicDigester)
            .is_none());
        assert!(provider
            .get_manure_composition_data_by_type(AnimalType::NotSelected, ManureStateType::Pasture)
            .is_none());
    }
}
