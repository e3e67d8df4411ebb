use crate::config::{
    default_flight_caption, DEFAULT_BOUNDARIES_PATH, DEFAULT_CURRENCY, DEFAULT_DATA_PATH,
    DEFAULT_NAME_PROPERTY, DEFAULT_OUTPUT_PATH, DEFAULT_REFERENCE_COUNTRY, DEFAULT_TITLE,
    DEFAULT_TRIP_LENGTH_DAYS,
};
use crate::core::render::{DEFAULT_TILES_ATTRIBUTION, DEFAULT_TILES_URL};
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub data_path: String,
    pub boundaries_path: String,
    pub name_property: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            boundaries_path: DEFAULT_BOUNDARIES_PATH.to_string(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub trip_length_days: u32,
    pub reference_country: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            trip_length_days: DEFAULT_TRIP_LENGTH_DAYS,
            reference_country: DEFAULT_REFERENCE_COUNTRY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_formats: vec![OutputFormat::Html],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub currency: String,
    pub flight_caption: Option<String>,
    pub tiles_url: String,
    pub tiles_attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            flight_caption: None,
            tiles_url: DEFAULT_TILES_URL.to_string(),
            tiles_attribution: DEFAULT_TILES_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// "compact"（預設）或 "json"
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MapError::file(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.data_path", &self.source.data_path)?;
        validation::validate_path("source.boundaries_path", &self.source.boundaries_path)?;
        validation::validate_non_empty_string("source.name_property", &self.source.name_property)?;
        validation::validate_positive_number(
            "transform.trip_length_days",
            self.transform.trip_length_days,
            1,
        )?;
        validation::validate_non_empty_string(
            "transform.reference_country",
            &self.transform.reference_country,
        )?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_url("map.tiles_url", &self.map.tiles_url)?;
        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn data_path(&self) -> &str {
        &self.source.data_path
    }

    fn boundaries_path(&self) -> &str {
        &self.source.boundaries_path
    }

    fn name_property(&self) -> &str {
        &self.source.name_property
    }

    fn trip_length_days(&self) -> u32 {
        self.transform.trip_length_days
    }

    fn reference_country(&self) -> &str {
        &self.transform.reference_country
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn map_title(&self) -> &str {
        &self.map.title
    }

    fn currency(&self) -> &str {
        &self.map.currency
    }

    fn flight_caption(&self) -> String {
        self.map
            .flight_caption
            .clone()
            .unwrap_or_else(|| default_flight_caption(&self.map.currency))
    }

    fn tiles_url(&self) -> &str {
        &self.map.tiles_url
    }

    fn tiles_attribution(&self) -> &str {
        &self.map.tiles_attribution
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
