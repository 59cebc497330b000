use serde::Deserialize;
use std::io::Read;

use crate::domain::enums::{ComponentCategory, ManureStateType};
use crate::domain::model::ClimateNormals;
use crate::providers::read_table;
use crate::utils::error::Result;

const BUILTIN_TABLE: &str = include_str!("../../resources/livestock_emission_conversion_factors.csv");

const LEACHING_SLOPE: f64 = 0.3247;
const LEACHING_INTERCEPT: f64 = 0.0247;
const MINIMUM_LEACHING_FRACTION: f64 = 0.05;
const MAXIMUM_LEACHING_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Deserialize)]
struct EmissionFactorRow {
    manure_state_type: ManureStateType,
    /// Blank rows apply to every category.
    category: Option<ComponentCategory>,
    methane_conversion_factor_cool: f64,
    methane_conversion_factor_temperate: f64,
    methane_conversion_factor_warm: f64,
    n2o_direct_emission_factor: f64,
    volatilization_fraction: f64,
    emission_factor_volatilization: f64,
    emission_factor_leach: f64,
}

impl EmissionFactorRow {
    fn methane_conversion_factor(&self, mean_annual_temperature: f64) -> f64 {
        if mean_annual_temperature < 10.0 {
            self.methane_conversion_factor_cool
        } else if mean_annual_temperature <= 20.0 {
            self.methane_conversion_factor_temperate
        } else {
            self.methane_conversion_factor_warm
        }
    }
}

/// Factors resolved for one storage state under one farm's climate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivestockEmissionConversionFactorsData {
    pub methane_conversion_factor: f64,
    pub n2o_direct_emission_factor: f64,
    pub volatilization_fraction: f64,
    pub emission_factor_volatilization: f64,
    pub leaching_fraction: f64,
    pub emission_factor_leach: f64,
}

/// `0.3247 · P/PET − 0.0247`, bounded to [0.05, 0.3].
pub fn calculate_fraction_of_nitrogen_lost_by_leaching_and_runoff(
    growing_season_precipitation: f64,
    growing_season_evapotranspiration: f64,
) -> f64 {
    if growing_season_evapotranspiration <= 0.0 {
        return MAXIMUM_LEACHING_FRACTION;
    }

    let fraction = LEACHING_SLOPE * (growing_season_precipitation / growing_season_evapotranspiration)
        - LEACHING_INTERCEPT;
    fraction.clamp(MINIMUM_LEACHING_FRACTION, MAXIMUM_LEACHING_FRACTION)
}

/// Table 36: manure emission and conversion factors.
#[derive(Debug, Clone)]
pub struct LivestockEmissionConversionFactorsProvider {
    rows: Vec<EmissionFactorRow>,
}

impl LivestockEmissionConversionFactorsProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            rows: read_table(reader)?,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    /// Category-specific row first, then the row shared by all categories.
    pub fn get_factors(
        &self,
        manure_state_type: ManureStateType,
        category: ComponentCategory,
        climate: &ClimateNormals,
    ) -> Option<LivestockEmissionConversionFactorsData> {
        let row = self
            .rows
            .iter()
            .find(|r| r.manure_state_type == manure_state_type && r.category == Some(category))
            .or_else(|| {
                self.rows
                    .iter()
                    .find(|r| r.manure_state_type == manure_state_type && r.category.is_none())
            })?;

        Some(LivestockEmissionConversionFactorsData {
            methane_conversion_factor: row.methane_conversion_factor(climate.mean_annual_temperature),
            n2o_direct_emission_factor: row.n2o_direct_emission_factor,
            volatilization_fraction: row.volatilization_fraction,
            emission_factor_volatilization: row.emission_factor_volatilization,
            leaching_fraction: calculate_fraction_of_nitrogen_lost_by_leaching_and_runoff(
                climate.total_annual_precipitation,
                climate.total_annual_evapotranspiration,
            ),
            emission_factor_leach: row.emission_factor_leach,
        })
    }
}
