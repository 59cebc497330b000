use crate::domain::model::{Defaults, Farm};
use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlSettings {
    #[serde(default)]
    pub run: RunSettings,
    pub defaults: Option<DefaultsOverrides>,
    pub monitoring: Option<MonitoringSettings>,
    pub output: Option<OutputSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            name: "farm-ghg".to_string(),
            description: String::new(),
        }
    }
}

/// Only the coefficients named in the file are replaced on each farm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsOverrides {
    pub carbon_concentration: Option<f64>,
    pub emission_factor_for_diesel: Option<f64>,
    pub emission_factor_for_herbicide: Option<f64>,
    pub fertilizer_direct_n2o_emission_factor: Option<f64>,
    pub fertilizer_volatilization_fraction: Option<f64>,
    pub emission_factor_volatilization: Option<f64>,
    pub leaching_fraction: Option<f64>,
    pub emission_factor_leaching: Option<f64>,
    pub manure_spreading_co2_per_kg_nitrogen: Option<f64>,
}

impl DefaultsOverrides {
    pub fn apply(&self, defaults: &mut Defaults) {
        let pairs = [
            (self.carbon_concentration, &mut defaults.carbon_concentration),
            (self.emission_factor_for_diesel, &mut defaults.emission_factor_for_diesel),
            (self.emission_factor_for_herbicide, &mut defaults.emission_factor_for_herbicide),
            (
                self.fertilizer_direct_n2o_emission_factor,
                &mut defaults.fertilizer_direct_n2o_emission_factor,
            ),
            (
                self.fertilizer_volatilization_fraction,
                &mut defaults.fertilizer_volatilization_fraction,
            ),
            (self.emission_factor_volatilization, &mut defaults.emission_factor_volatilization),
            (self.leaching_fraction, &mut defaults.leaching_fraction),
            (self.emission_factor_leaching, &mut defaults.emission_factor_leaching),
            (
                self.manure_spreading_co2_per_kg_nitrogen,
                &mut defaults.manure_spreading_co2_per_kg_nitrogen,
            ),
        ];

        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub path: String,
    #[serde(default)]
    pub pretty: bool,
}

impl TomlSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let settings: Self = toml::from_str(&processed)?;
        Ok(settings)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }

    pub fn pretty_output(&self) -> bool {
        self.output.as_ref().is_some_and(|o| o.pretty)
    }

    /// Applies the `[defaults]` overrides; the farm must be recalculated afterwards.
    pub fn apply_to_farm(&self, farm: &mut Farm) {
        let Some(overrides) = self.defaults.as_ref().filter(|d| !d.is_empty()) else {
            return;
        };
        overrides.apply(&mut farm.defaults);
        farm.mark_modified();
        tracing::debug!("🔧 Applied default overrides to farm '{}'", farm.name);
    }
}

/// 替換環境變數 (例如 ${DATA_DIR})；未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").ok()) else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl Validate for TomlSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("run.name", &self.run.name)?;

        if let Some(output) = &self.output {
            validate_path("output.path", &output.path)?;
            if output.path.contains("${") {
                return Err(FarmError::InvalidConfigValueError {
                    field: "output.path".to_string(),
                    value: output.path.clone(),
                    reason: "Unresolved environment variable".to_string(),
                });
            }
        }

        if let Some(overrides) = &self.defaults {
            let mut defaults = Defaults::default();
            overrides.apply(&mut defaults);
            defaults.validate()?;
        }

        Ok(())
    }
}
