use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

use crate::domain::enums::Province;
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/milk_production.csv");

#[derive(Debug, Clone, Deserialize)]
struct MilkProductionRow {
    province: Province,
    year: i32,
    average_milk_production: f64,
}

/// Table 21: average milk production (kg head^-1 day^-1) by province and year.
#[derive(Debug, Clone)]
pub struct MilkProductionProvider {
    by_province_and_year: HashMap<(Province, i32), f64>,
}

impl MilkProductionProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<MilkProductionRow> = read_table(reader)?;
        Ok(Self {
            by_province_and_year: rows
                .into_iter()
                .map(|r| ((r.province, r.year), r.average_milk_production))
                .collect(),
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.by_province_and_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_province_and_year.is_empty()
    }

    pub fn get_average_milk_production(&self, province: Province, year: i32) -> Option<f64> {
        self.by_province_and_year.get(&(province, year)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_province() {
        let provider = MilkProductionProvider::builtin().unwrap();
        for province in [Province::Alberta, Province::Quebec, Province::NewfoundlandAndLabrador] {
            assert!(provider.get_average_milk_production(province, 2020).is_some());
        }
    }

    #[test]
    fn test_year_outside_table_is_none() {
        let provider = MilkProductionProvider::builtin().unwrap();
        assert!(provider.get_average_milk_production(Province::Ontario, 1850).is_none());
    }
}
