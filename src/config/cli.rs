use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{validate_file_extensions, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "farm-ghg")]
#[command(about = "Greenhouse gas and nutrient results for farm models")]
pub struct CliArgs {
    /// Farm JSON files
    #[arg(short, long = "input", value_delimiter = ',', required = true)]
    pub inputs: Vec<String>,

    /// TOML run settings
    #[arg(short = 'c', long = "settings")]
    pub settings: Option<String>,

    #[arg(short, long = "output", default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log system resource usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Initialize and calculate without writing results")]
    pub dry_run: bool,
}

impl ConfigProvider for CliArgs {
    fn input_files(&self) -> &[String] {
        &self.inputs
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn monitor_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(FarmError::MissingConfigError {
                field: "input".to_string(),
            });
        }
        validate_file_extensions("input", &self.inputs, &["json"])?;
        validate_path("output", &self.output_path)?;
        if let Some(settings) = &self.settings {
            validate_file_extensions("settings", std::slice::from_ref(settings), &["toml"])?;
        }
        Ok(())
    }
}
