//! 讀取國家資料（YAML/JSON）與國界資料（GeoJSON）。
//!
//! 兩個函式都只處理已讀入的位元組，檔案存取交給 `Storage`。

use crate::domain::model::{BoundaryRecord, CountryRecord};
use crate::utils::error::{MapError, Result};
use serde_yaml::{Mapping, Value};
use std::str::FromStr;

/// 機票價格欄位，第二個是舊資料使用的拼法
const FLIGHT_PRICE_KEYS: [&str; 2] = ["flights_price", "flight_price"];
const COST_LIVING_KEY: &str = "cost_living_index";
const COST_PER_DAY_KEY: &str = "cost_per_day";

#[derive(Debug, Clone)]
pub struct BoundarySet {
    pub records: Vec<BoundaryRecord>,
    /// 沒有國名或不是多邊形而被略過的 feature 數
    pub skipped: usize,
}

/// 解析 `國名 -> {flights_price, cost_living_index, cost_per_day}` 的對應表，保留檔案中的順序
pub fn parse_country_records(path: &str, bytes: &[u8]) -> Result<Vec<CountryRecord>> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(MapError::EmptyDatasetError {
            path: path.to_string(),
        });
    }

    let document: Value = serde_yaml::from_slice(bytes).map_err(|e| MapError::ParseError {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let countries = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        other => {
            return Err(MapError::ParseError {
                path: path.to_string(),
                message: format!(
                    "expected a mapping of country name to record, found {}",
                    describe(&other)
                ),
            })
        }
    };

    if countries.is_empty() {
        return Err(MapError::EmptyDatasetError {
            path: path.to_string(),
        });
    }

    let mut records = Vec::with_capacity(countries.len());
    for (key, value) in &countries {
        let name = key.as_str().ok_or_else(|| MapError::ParseError {
            path: path.to_string(),
            message: format!("country names must be strings, found {}", describe(key)),
        })?;

        let fields = value.as_mapping().ok_or_else(|| MapError::MalformedRecordError {
            country: name.to_string(),
            field: "<record>".to_string(),
            reason: format!("must be a mapping, found {}", describe(value)),
        })?;

        records.push(CountryRecord {
            name: name.to_string(),
            flight_price: number_field(name, fields, &FLIGHT_PRICE_KEYS)?,
            cost_living_index: number_field(name, fields, &[COST_LIVING_KEY])?,
            cost_per_day: number_field(name, fields, &[COST_PER_DAY_KEY])?,
        });
    }

    tracing::debug!("Parsed {} country records from {}", records.len(), path);
    Ok(records)
}

/// 依序找第一個存在的鍵；全部不存在或不是有限數值都視為格式錯誤
fn number_field(country: &str, fields: &Mapping, keys: &[&str]) -> Result<f64> {
    let (key, value) = keys
        .iter()
        .find_map(|key| fields.get(*key).map(|value| (*key, value)))
        .ok_or_else(|| MapError::MalformedRecordError {
            country: country.to_string(),
            field: keys[0].to_string(),
            reason: "is missing".to_string(),
        })?;

    match value.as_f64() {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(MapError::MalformedRecordError {
            country: country.to_string(),
            field: key.to_string(),
            reason: format!("must be a finite number, found {}", describe(value)),
        }),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}

/// 解析國界 FeatureCollection，每個 feature 以 `name_property` 屬性作為國名
pub fn parse_boundaries(path: &str, bytes: &[u8], name_property: &str) -> Result<BoundarySet> {
    let text = std::str::from_utf8(bytes).map_err(|e| MapError::ParseError {
        path: path.to_string(),
        message: format!("not valid UTF-8: {}", e),
    })?;

    let geojson = geojson::GeoJson::from_str(text).map_err(|e| MapError::ParseError {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let collection = match geojson {
        geojson::GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(MapError::ParseError {
                path: path.to_string(),
                message: "expected a GeoJSON FeatureCollection".to_string(),
            })
        }
    };

    let mut records = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;

    for (index, feature) in collection.features.into_iter().enumerate() {
        let name = match feature.property(name_property).and_then(|v| v.as_str()) {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!(
                    "⚠️ Feature #{} in {} has no '{}' property, skipping",
                    index,
                    path,
                    name_property
                );
                skipped += 1;
                continue;
            }
        };

        match feature.geometry {
            Some(geometry)
                if matches!(
                    geometry.value,
                    geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_)
                ) =>
            {
                records.push(BoundaryRecord { name, geometry });
            }
            _ => {
                tracing::warn!("⚠️ Boundary '{}' is not a polygon, skipping", name);
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Parsed {} boundaries from {} ({} skipped)",
        records.len(),
        path,
        skipped
    );
    Ok(BoundarySet { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"
Spain:
  flights_price: 50
  cost_living_index: 70
  cost_per_day: 80
Portugal:
  flight_price: 60.5
  cost_living_index: 65
  cost_per_day: 75
"#;

    #[test]
    fn test_parse_records_in_file_order() {
        let records = parse_country_records("data.yml", DATA.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Spain");
        assert_eq!(records[0].flight_price, 50.0);
        assert_eq!(records[1].name, "Portugal");
        assert_eq!(records[1].flight_price, 60.5);
        assert_eq!(records[1].cost_per_day, 75.0);
    }

    #[test]
    fn test_parse_records_accepts_json() {
        let json = r#"{"Spain": {"flights_price": 50, "cost_living_index": 70, "cost_per_day": 80}}"#;
        let records = parse_country_records("data.json", json.as_bytes()).unwrap();
        assert_eq!(records[0].cost_living_index, 70.0);
    }

    #[test]
    fn test_missing_field_names_country_and_field() {
        let data = "France:\n  flights_price: 90\n  cost_living_index: 80\n";
        let err = parse_country_records("data.yml", data.as_bytes()).unwrap_err();

        match err {
            MapError::MalformedRecordError { country, field, .. } => {
                assert_eq!(country, "France");
                assert_eq!(field, "cost_per_day");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field_is_malformed() {
        let data = "Italy:\n  flights_price: cheap\n  cost_living_index: 80\n  cost_per_day: 90\n";
        let err = parse_country_records("data.yml", data.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            MapError::MalformedRecordError { ref field, .. } if field == "flights_price"
        ));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(matches!(
            parse_country_records("data.yml", b"  \n").unwrap_err(),
            MapError::EmptyDatasetError { .. }
        ));
        assert!(matches!(
            parse_country_records("data.yml", b"{}").unwrap_err(),
            MapError::EmptyDatasetError { .. }
        ));
    }

    #[test]
    fn test_non_mapping_document_is_parse_error() {
        let err = parse_country_records("data.yml", b"- Spain\n- Portugal\n").unwrap_err();
        assert!(matches!(err, MapError::ParseError { ref path, .. } if path == "data.yml"));
    }

    #[test]
    fn test_duplicate_country_is_parse_error() {
        let data = format!("{}Spain:\n  flights_price: 55\n  cost_living_index: 71\n  cost_per_day: 81\n", DATA);
        let err = parse_country_records("data.yml", data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            MapError::ParseError { ref path, ref message } if path == "data.yml" && message.contains("Spain")
        ));

        // JSON 也走同一個解析器，重複的鍵一樣被拒絕
        let json = r#"{"Spain": {"flights_price": 50, "cost_living_index": 70, "cost_per_day": 80},
                       "Spain": {"flights_price": 55, "cost_living_index": 71, "cost_per_day": 81}}"#;
        let err = parse_country_records("data.json", json.as_bytes()).unwrap_err();
        assert!(matches!(err, MapError::ParseError { ref path, .. } if path == "data.json"));
    }

    #[test]
    fn test_parse_boundaries_skips_unusable_features() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"NAME": "Spain"},
                 "geometry": {"type": "Polygon", "coordinates": [[[-9.0, 36.0], [3.0, 36.0], [3.0, 43.5], [-9.0, 43.5], [-9.0, 36.0]]]}},
                {"type": "Feature", "properties": {"NAME": "Somewhere"},
                 "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
                {"type": "Feature", "properties": {"ISO": "PT"},
                 "geometry": {"type": "Polygon", "coordinates": [[[-9.5, 37.0], [-6.2, 37.0], [-6.2, 42.1], [-9.5, 37.0]]]}}
            ]
        }"#;

        let set = parse_boundaries("world.geojson", geojson.as_bytes(), "NAME").unwrap();

        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].name, "Spain");
        assert_eq!(set.skipped, 2);
    }

    #[test]
    fn test_parse_boundaries_requires_feature_collection() {
        let geojson = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        let err = parse_boundaries("world.geojson", geojson.as_bytes(), "NAME").unwrap_err();
        assert!(matches!(err, MapError::ParseError { .. }));
    }
}
