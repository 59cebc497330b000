use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

use crate::domain::enums::AnimalType;
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/methane_producing_capacity.csv");

#[derive(Debug, Clone, Deserialize)]
struct MethaneCapacityRow {
    animal_type: AnimalType,
    methane_producing_capacity: f64,
}

/// Table 35: maximum methane producing capacity B0 (m³ CH4 kg^-1 VS).
#[derive(Debug, Clone)]
pub struct MethaneProducingCapacityProvider {
    by_animal_type: HashMap<AnimalType, f64>,
}

impl MethaneProducingCapacityProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<MethaneCapacityRow> = read_table(reader)?;
        Ok(Self {
            by_animal_type: rows
                .into_iter()
                .map(|r| (r.animal_type, r.methane_producing_capacity))
                .collect(),
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    pub fn get_methane_producing_capacity_of_manure(&self, animal_type: AnimalType) -> Option<f64> {
        self.by_animal_type
            .get(&animal_type)
            .or_else(|| self.by_animal_type.get(&animal_type.category_type()?))
            .copied()
    }
}
