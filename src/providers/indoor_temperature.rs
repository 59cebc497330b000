use serde::Deserialize;
use std::io::Read;

use crate::domain::enums::Province;
use crate::domain::model::BarnTemperatureData;
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/indoor_temperature.csv");

#[derive(Debug, Clone, Deserialize)]
struct IndoorTemperatureRow {
    province: Province,
    january: f64,
    february: f64,
    march: f64,
    april: f64,
    may: f64,
    june: f64,
    july: f64,
    august: f64,
    september: f64,
    october: f64,
    november: f64,
    december: f64,
}

impl IndoorTemperatureRow {
    fn monthly(&self) -> [f64; 12] {
        [
            self.january,
            self.february,
            self.march,
            self.april,
            self.may,
            self.june,
            self.july,
            self.august,
            self.september,
            self.october,
            self.november,
            self.december,
        ]
    }
}

/// Table 63: barn temperature by province (°C).
#[derive(Debug, Clone)]
pub struct IndoorTemperatureProvider {
    rows: Vec<IndoorTemperatureRow>,
}

impl IndoorTemperatureProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            rows: read_table(reader)?,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    /// Returned data is not yet marked initialized; the caller decides that.
    pub fn get_indoor_temperature(&self, province: Province) -> Option<BarnTemperatureData> {
        self.rows
            .iter()
            .find(|r| r.province == province)
            .map(|r| BarnTemperatureData {
                province,
                monthly_temperatures: r.monthly(),
                is_initialized: false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barn_is_warmest_in_summer() {
        let provider = IndoorTemperatureProvider::builtin().unwrap();
        let data = provider.get_indoor_temperature(Province::Manitoba).unwrap();

        assert_eq!(data.province, Province::Manitoba);
        assert!(!data.is_initialized);
        assert!(data.monthly_temperatures[6] > data.monthly_temperatures[0]);
    }
}
