// Default-data tables. Each provider is parsed once from a bundled CSV resource and is
// read-only afterwards.

pub mod bedding;
pub mod emission_factors;
pub mod fuel_energy;
pub mod indoor_temperature;
pub mod manure_composition;
pub mod methane_capacity;
pub mod milk_production;
pub mod mineralization;
pub mod shelterbelt;

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::sync::{Arc, OnceLock};

use crate::utils::error::Result;

pub use bedding::BeddingMaterialCompositionProvider;
pub use emission_factors::LivestockEmissionConversionFactorsProvider;
pub use fuel_energy::FuelEnergyEstimatesProvider;
pub use indoor_temperature::IndoorTemperatureProvider;
pub use manure_composition::ManureCompositionProvider;
pub use methane_capacity::MethaneProducingCapacityProvider;
pub use milk_production::MilkProductionProvider;
pub use mineralization::MineralizationFractionProvider;
pub use shelterbelt::{EcodistrictClusterProvider, ShelterbeltCarbonDataProvider};

/// 解析含標頭的 CSV 表格，每列反序列化為 `T`
pub(crate) fn read_table<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// 所有預設資料表的集合
#[derive(Debug)]
pub struct DefaultDataTables {
    pub manure_composition: ManureCompositionProvider,
    pub milk_production: MilkProductionProvider,
    pub bedding: BeddingMaterialCompositionProvider,
    pub methane_capacity: MethaneProducingCapacityProvider,
    pub emission_factors: LivestockEmissionConversionFactorsProvider,
    pub mineralization: MineralizationFractionProvider,
    pub fuel_energy: FuelEnergyEstimatesProvider,
    pub indoor_temperature: IndoorTemperatureProvider,
    pub shelterbelt: ShelterbeltCarbonDataProvider,
}

static SHARED_TABLES: OnceLock<Arc<DefaultDataTables>> = OnceLock::new();

impl DefaultDataTables {
    /// 載入隨套件附帶的資料表
    pub fn builtin() -> Result<Self> {
        let tables = Self {
            manure_composition: ManureCompositionProvider::builtin()?,
            milk_production: MilkProductionProvider::builtin()?,
            bedding: BeddingMaterialCompositionProvider::builtin()?,
            methane_capacity: MethaneProducingCapacityProvider::builtin()?,
            emission_factors: LivestockEmissionConversionFactorsProvider::builtin()?,
            mineralization: MineralizationFractionProvider::builtin()?,
            fuel_energy: FuelEnergyEstimatesProvider::builtin()?,
            indoor_temperature: IndoorTemperatureProvider::builtin()?,
            shelterbelt: ShelterbeltCarbonDataProvider::builtin()?,
        };

        tracing::debug!(
            "📚 Default tables loaded: {} composition rows, {} milk rows, {} shelterbelt rows",
            tables.manure_composition.data().len(),
            tables.milk_production.len(),
            tables.shelterbelt.len()
        );

        Ok(tables)
    }

    /// Process-wide tables, loaded on first use.
    pub fn shared() -> Result<Arc<Self>> {
        if let Some(tables) = SHARED_TABLES.get() {
            return Ok(Arc::clone(tables));
        }

        let loaded = Arc::new(Self::builtin()?);
        // A concurrent first call may have won the race; either copy is equivalent.
        Ok(Arc::clone(SHARED_TABLES.get_or_init(|| loaded)))
    }
}
