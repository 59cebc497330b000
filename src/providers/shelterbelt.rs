use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

use crate::core::interpolation::{
    approximately_equal, find_single, interpolate_linear, LookupMiss, YearPartitionedTable,
    KEY_TOLERANCE,
};
use crate::domain::enums::{HardinessZone, TreeSpecies};
use crate::providers::read_table;
use crate::utils::error::Result;

const PAST_TABLE: &str = include_str!("../../resources/shelterbelt_carbon_past.csv");
const FUTURE_TABLE: &str = include_str!("../../resources/shelterbelt_carbon_future.csv");
const CLUSTER_TABLE: &str = include_str!("../../resources/shelterbelt_ecodistrict_clusters.csv");

/// First year served by the future regime.
pub const SHELTERBELT_CUT_YEAR: i32 = 2016;
/// Oldest age in the tables; older rows are looked up at this age.
pub const MAXIMUM_SHELTERBELT_AGE: u32 = 60;

/// One row per (species, cluster, mortality %, age). Carbon in Mg C km^-1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShelterbeltDomProviderData {
    pub species: TreeSpecies,
    pub cluster_id: String,
    pub percentage_mortality: f64,
    pub age: u32,
    pub tec_per_kilometer_per_year: f64,
    pub tec_per_kilometer: f64,
    pub biomass_carbon_per_kilometer_per_year: f64,
    pub biomass_carbon_per_kilometer: f64,
    pub dead_organic_matter_carbon_per_kilometer_per_year: f64,
    pub dead_organic_matter_carbon_per_kilometer: f64,
}

/// Carbon metric to read from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    DomMgCKm,
    DomMgCKmYr,
    BiomMgCKm,
    BiomMgCKmYr,
    TecMgCKm,
    TecMgCKmYr,
}

impl ShelterbeltDomProviderData {
    pub fn value(&self, column: Columns) -> f64 {
        match column {
            Columns::DomMgCKm => self.dead_organic_matter_carbon_per_kilometer,
            Columns::DomMgCKmYr => self.dead_organic_matter_carbon_per_kilometer_per_year,
            Columns::BiomMgCKm => self.biomass_carbon_per_kilometer,
            Columns::BiomMgCKmYr => self.biomass_carbon_per_kilometer_per_year,
            Columns::TecMgCKm => self.tec_per_kilometer,
            Columns::TecMgCKmYr => self.tec_per_kilometer_per_year,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EcodistrictClusterRow {
    ecodistrict_id: u32,
    cluster_id: String,
}

/// Many ecodistricts share one cluster's growth data.
#[derive(Debug, Clone)]
pub struct EcodistrictClusterProvider {
    clusters: HashMap<u32, String>,
}

impl EcodistrictClusterProvider {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<EcodistrictClusterRow> = read_table(reader)?;
        Ok(Self {
            clusters: rows
                .into_iter()
                .map(|r| (r.ecodistrict_id, r.cluster_id))
                .collect(),
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_reader(CLUSTER_TABLE.as_bytes())
    }

    pub fn get_cluster_id(&self, ecodistrict_id: u32) -> Option<&str> {
        self.clusters.get(&ecodistrict_id).map(String::as_str)
    }
}

/// 林帶碳儲量查詢，依年份分區並在死亡率之間線性內插
#[derive(Debug, Clone)]
pub struct ShelterbeltCarbonDataProvider {
    data: YearPartitionedTable<ShelterbeltDomProviderData>,
    clusters: EcodistrictClusterProvider,
}

impl ShelterbeltCarbonDataProvider {
    pub fn new(
        data: YearPartitionedTable<ShelterbeltDomProviderData>,
        clusters: EcodistrictClusterProvider,
    ) -> Self {
        Self { data, clusters }
    }

    pub fn from_readers<P: Read, F: Read, C: Read>(past: P, future: F, clusters: C) -> Result<Self> {
        Ok(Self::new(
            YearPartitionedTable::new(SHELTERBELT_CUT_YEAR, read_table(past)?, read_table(future)?),
            EcodistrictClusterProvider::from_reader(clusters)?,
        ))
    }

    pub fn builtin() -> Result<Self> {
        Self::from_readers(
            PAST_TABLE.as_bytes(),
            FUTURE_TABLE.as_bytes(),
            CLUSTER_TABLE.as_bytes(),
        )
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_data(&self, year: i32) -> &[ShelterbeltDomProviderData] {
        self.data.partition(year)
    }

    /// Interpolated carbon value for a shelterbelt, or zero when the tables do not cover
    /// the query.
    ///
    /// Ages beyond the table are clamped. The hardiness zone does not select rows in the
    /// current tables.
    #[allow(clippy::too_many_arguments)]
    pub fn get_interpolated_value(
        &self,
        species: TreeSpecies,
        _hardiness_zone: HardinessZone,
        ecodistrict_id: u32,
        percent_mortality: f64,
        mortality_low: f64,
        mortality_high: f64,
        age: u32,
        column: Columns,
        year: i32,
    ) -> f64 {
        let age = age.min(MAXIMUM_SHELTERBELT_AGE);

        let Some(cluster_id) = self.clusters.get_cluster_id(ecodistrict_id) else {
            tracing::error!(
                "❌ Shelterbelt lookup: no cluster for ecodistrict {}",
                ecodistrict_id
            );
            return 0.0;
        };

        let rows = self.get_data(year);
        let row_at = |mortality: f64| {
            find_single(rows, |row| {
                row.species == species
                    && row.cluster_id == cluster_id
                    && approximately_equal(row.percentage_mortality, mortality, KEY_TOLERANCE)
                    && row.age == age
            })
        };

        match (row_at(mortality_low), row_at(mortality_high)) {
            (Ok(low), Ok(high)) => interpolate_linear(
                percent_mortality,
                mortality_low,
                mortality_high,
                low.value(column),
                high.value(column),
            ),
            (low, high) => {
                let describe = |miss: std::result::Result<&ShelterbeltDomProviderData, LookupMiss>| match miss {
                    Ok(_) => "found".to_string(),
                    Err(LookupMiss::NotFound) => "missing".to_string(),
                    Err(LookupMiss::Ambiguous(n)) => format!("{} candidate rows", n),
                };
                tracing::error!(
                    "❌ Shelterbelt lookup cannot find value: {:?}, cluster {}, age {}, year {} (low {}%: {}, high {}%: {})",
                    species,
                    cluster_id,
                    age,
                    year,
                    mortality_low,
                    describe(low),
                    mortality_high,
                    describe(high)
                );
                0.0
            }
        }
    }
}
