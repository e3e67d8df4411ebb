use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 資料檔中的一筆國家紀錄（尚未轉換）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub flight_price: f64,
    pub cost_living_index: f64,
    pub cost_per_day: f64,
}

/// 轉換後的指標：生活成本已正規化，每日花費已換算成預算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryMetrics {
    pub name: String,
    pub flight_price: f64,
    pub cost_living_index: f64,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub name: String,
    pub geometry: geojson::Geometry,
}

/// extract 階段的輸出
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<CountryRecord>,
    pub boundaries: Vec<BoundaryRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub metrics: CountryMetrics,
    pub geometry: geojson::Geometry,
}

impl JoinedRecord {
    pub fn name(&self) -> &str {
        &self.metrics.name
    }
}

/// 合併時被丟棄的國家名稱
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    /// 有資料但沒有邊界的國家
    pub missing_boundaries: Vec<String>,
    /// 有邊界但沒有資料的國家
    pub missing_records: Vec<String>,
}

impl JoinReport {
    pub fn dropped_count(&self) -> usize {
        self.missing_boundaries.len() + self.missing_records.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    FlightPrice,
    CostOfLiving,
    Budget,
}

/// 生活成本指數與預算顯示時的小數位數
pub const COST_LIVING_DECIMALS: i32 = 2;
pub const BUDGET_DECIMALS: i32 = 1;

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::FlightPrice, Metric::CostOfLiving, Metric::Budget];

    /// 圖層與匯出欄位使用的鍵名
    pub fn key(&self) -> &'static str {
        match self {
            Metric::FlightPrice => "flights_price",
            Metric::CostOfLiving => "cost_living_index",
            Metric::Budget => "budget",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::FlightPrice => "Flights price",
            Metric::CostOfLiving => "Cost of living",
            Metric::Budget => "Budget",
        }
    }

    pub fn value(&self, metrics: &CountryMetrics) -> f64 {
        match self {
            Metric::FlightPrice => metrics.flight_price,
            Metric::CostOfLiving => metrics.cost_living_index,
            Metric::Budget => metrics.budget,
        }
    }

    /// 提示框與 CSV 使用的文字；機票價格照原值輸出，其餘固定小數位數
    pub fn display(&self, metrics: &CountryMetrics) -> String {
        let value = self.value(metrics);
        match self {
            Metric::FlightPrice => value.to_string(),
            Metric::CostOfLiving => format!("{:.*}", COST_LIVING_DECIMALS as usize, value),
            Metric::Budget => format!("{:.*}", BUDGET_DECIMALS as usize, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Csv,
    Geojson,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::Geojson => "geojson",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "csv" => Ok(OutputFormat::Csv),
            "geojson" => Ok(OutputFormat::Geojson),
            other => Err(format!(
                "Unsupported format '{}'. Valid formats: html, csv, geojson",
                other
            )),
        }
    }
}

/// 經緯度外框，[[south, west], [north, east]]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub metric: &'static str,
    pub min: f64,
    pub max: f64,
    pub features: usize,
}

#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub html: String,
    pub layers: Vec<LayerSummary>,
    pub bounds: Bounds,
}

/// 附加輸出檔案（CSV、GeoJSON）
#[derive(Debug, Clone)]
pub struct Export {
    pub format: OutputFormat,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub joined: Vec<JoinedRecord>,
    pub report: JoinReport,
    pub map: RenderedMap,
    pub exports: Vec<Export>,
}
