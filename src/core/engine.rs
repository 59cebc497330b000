use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::storage::{load_farm, results_file_name, save_results};
use crate::app::calculators::reference_results_service;
use crate::config::settings::TomlSettings;
use crate::core::farm_results::FarmResultsService;
use crate::core::initialization::InitializationService;
use crate::domain::model::Farm;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::domain::results::FarmEmissionResults;
use crate::providers::DefaultDataTables;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use crate::utils::validation::Validate;

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub farms_processed: usize,
    pub written: Vec<PathBuf>,
    pub total_profit: f64,
}

/// 批次引擎：載入農場、初始化預設值、計算結果並寫出
pub struct FarmEngine<S: Storage> {
    storage: S,
    initialization: InitializationService,
    results_service: FarmResultsService,
    settings: TomlSettings,
    inputs: Vec<String>,
    output_dir: PathBuf,
    pretty: bool,
    dry_run: bool,
    monitor: RunMonitor,
}

impl<S: Storage> FarmEngine<S> {
    /// Engine with the reference calculators.
    pub fn new(storage: S, tables: Arc<DefaultDataTables>) -> Self {
        Self {
            storage,
            initialization: InitializationService::new(Arc::clone(&tables)),
            results_service: reference_results_service(tables),
            settings: TomlSettings::default(),
            inputs: Vec::new(),
            output_dir: PathBuf::from("output"),
            pretty: false,
            dry_run: false,
            monitor: RunMonitor::default(),
        }
    }

    pub fn with_results_service(mut self, results_service: FarmResultsService) -> Self {
        self.results_service = results_service;
        self
    }

    /// 從設定來源取得輸入檔、輸出目錄與監控開關
    pub fn with_config(mut self, config: &dyn ConfigProvider) -> Self {
        self.inputs = config.input_files().to_vec();
        self.with_output_dir(config.output_path())
            .with_monitoring(config.monitor_enabled())
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// `[output]` in the settings replaces the output directory set so far.
    pub fn with_settings(mut self, settings: TomlSettings) -> Self {
        if let Some(path) = settings.output_path() {
            self.output_dir = PathBuf::from(path);
        }
        self.pretty = settings.pretty_output();
        if settings.monitoring_enabled() && !self.monitor.is_enabled() {
            self.monitor = RunMonitor::new(true);
        }
        self.settings = settings;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = RunMonitor::new(enabled || self.settings.monitoring_enabled());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn results_service(&self) -> &FarmResultsService {
        &self.results_service
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn monitor(&self) -> &RunMonitor {
        &self.monitor
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Runs over the input files taken from [`FarmEngine::with_config`].
    pub fn run_configured(&mut self) -> Result<RunSummary> {
        let inputs = std::mem::take(&mut self.inputs);
        let outcome = self.run(&inputs);
        self.inputs = inputs;
        outcome
    }

    pub fn run(&mut self, inputs: &[String]) -> Result<RunSummary> {
        tracing::info!("🚜 Starting run '{}' with {} farm file(s)", self.settings.run.name, inputs.len());
        self.monitor.log_stats("Start");

        let mut farms = self.load_farms(inputs)?;
        self.monitor.log_stats("Load");

        self.prepare_farms(&mut farms)?;
        self.monitor.log_stats("Initialization");

        let results = self.calculate(&mut farms)?;
        self.monitor.log_stats("Calculation");

        let written = if self.dry_run {
            tracing::info!("🧪 Dry run, results not written");
            Vec::new()
        } else {
            self.write_results(&results)?
        };

        self.monitor.log_final_stats();

        Ok(RunSummary {
            farms_processed: results.len(),
            written,
            total_profit: results.iter().map(|r| r.economics_profit).sum(),
        })
    }

    pub fn load_farms(&self, inputs: &[String]) -> Result<Vec<Farm>> {
        inputs
            .iter()
            .map(|input| {
                let farm = load_farm(&self.storage, Path::new(input))?;
                farm.validate()?;
                Ok(farm)
            })
            .collect()
    }

    /// Applies setting overrides, then re-initializes every farm from the default tables.
    pub fn prepare_farms(&self, farms: &mut [Farm]) -> Result<()> {
        for farm in farms.iter_mut() {
            self.settings.apply_to_farm(farm);
            self.initialization.check_initialization(farm);
        }
        self.initialization.re_initialize_farms(farms)?;
        tracing::info!("🔄 Initialized {} farm(s)", farms.len());
        Ok(())
    }

    pub fn calculate(&mut self, farms: &mut [Farm]) -> Result<Vec<Arc<FarmEmissionResults>>> {
        let mut all_results = Vec::with_capacity(farms.len());

        for farm in farms.iter_mut() {
            let results = self.results_service.calculate_farm_emission_results(farm)?;
            for (stage, duration) in self.results_service.stage_timings() {
                self.monitor.record_stage(&format!("{} / {}", farm.name, stage), *duration);
            }
            all_results.push(results);
        }

        Ok(all_results)
    }

    pub fn write_results(&self, results: &[Arc<FarmEmissionResults>]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(results.len());

        for farm_results in results {
            let path = self
                .output_dir
                .join(results_file_name(&farm_results.farm_name, farm_results.farm_guid));
            save_results(&self.storage, &path, farm_results, self.pretty)?;
            written.push(path);
        }

        tracing::info!("💾 Wrote {} result file(s) to {}", written.len(), self.output_dir.display());
        Ok(written)
    }
}
