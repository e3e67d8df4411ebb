pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::render::{DEFAULT_TILES_ATTRIBUTION, DEFAULT_TILES_URL};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_PATH: &str = "data.yml";
pub const DEFAULT_BOUNDARIES_PATH: &str = "world/countries.geojson";
pub const DEFAULT_NAME_PROPERTY: &str = "NAME";
pub const DEFAULT_OUTPUT_PATH: &str = "map.html";
pub const DEFAULT_TRIP_LENGTH_DAYS: u32 = 9;
pub const DEFAULT_REFERENCE_COUNTRY: &str = "Spain";
pub const DEFAULT_CURRENCY: &str = "€";
pub const DEFAULT_TITLE: &str = "Travel costs";

pub fn default_flight_caption(currency: &str) -> String {
    format!("Flights price for November, just one way ({})", currency)
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "travel-map")]
#[command(about = "Render a travel cost choropleth map from country data and boundaries")]
pub struct CliConfig {
    /// Country records (YAML or JSON mapping of country name to costs)
    #[arg(long = "data", env = "TRAVEL_MAP_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data_path: String,

    /// Country boundaries as a GeoJSON FeatureCollection
    #[arg(long = "boundaries", env = "TRAVEL_MAP_BOUNDARIES", default_value = DEFAULT_BOUNDARIES_PATH)]
    pub boundaries_path: String,

    /// Boundary property holding the country name
    #[arg(long, env = "TRAVEL_MAP_NAME_PROPERTY", default_value = DEFAULT_NAME_PROPERTY)]
    pub name_property: String,

    #[arg(long = "days", env = "TRAVEL_MAP_DAYS", default_value_t = DEFAULT_TRIP_LENGTH_DAYS)]
    pub trip_length_days: u32,

    /// Country whose cost of living index becomes 1.00
    #[arg(long = "reference", env = "TRAVEL_MAP_REFERENCE", default_value = DEFAULT_REFERENCE_COUNTRY)]
    pub reference_country: String,

    #[arg(long = "output", env = "TRAVEL_MAP_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Extra outputs written next to the map (csv, geojson)
    #[arg(long = "formats", env = "TRAVEL_MAP_FORMATS", value_delimiter = ',')]
    pub output_formats: Vec<OutputFormat>,

    #[arg(long, env = "TRAVEL_MAP_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    #[arg(long, env = "TRAVEL_MAP_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Legend caption of the flight price layer
    #[arg(long, env = "TRAVEL_MAP_FLIGHT_CAPTION")]
    pub flight_caption: Option<String>,

    #[arg(long, env = "TRAVEL_MAP_TILES_URL", default_value = DEFAULT_TILES_URL)]
    pub tiles_url: String,

    #[arg(long, env = "TRAVEL_MAP_TILES_ATTRIBUTION", default_value = DEFAULT_TILES_ATTRIBUTION)]
    pub tiles_attribution: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn boundaries_path(&self) -> &str {
        &self.boundaries_path
    }

    fn name_property(&self) -> &str {
        &self.name_property
    }

    fn trip_length_days(&self) -> u32 {
        self.trip_length_days
    }

    fn reference_country(&self) -> &str {
        &self.reference_country
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.output_formats
    }

    fn map_title(&self) -> &str {
        &self.title
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn flight_caption(&self) -> String {
        self.flight_caption
            .clone()
            .unwrap_or_else(|| default_flight_caption(&self.currency))
    }

    fn tiles_url(&self) -> &str {
        &self.tiles_url
    }

    fn tiles_attribution(&self) -> &str {
        &self.tiles_attribution
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data", &self.data_path)?;
        validation::validate_path("boundaries", &self.boundaries_path)?;
        validation::validate_path("output", &self.output_path)?;
        validation::validate_non_empty_string("name_property", &self.name_property)?;
        validation::validate_positive_number("days", self.trip_length_days, 1)?;
        validation::validate_non_empty_string("reference", &self.reference_country)?;
        validation::validate_url("tiles_url", &self.tiles_url)?;
        Ok(())
    }
}
