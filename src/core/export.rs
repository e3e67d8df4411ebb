use crate::domain::model::{CountryMetrics, JoinedRecord, Metric};
use crate::utils::error::{MapError, Result};
use geojson::{Feature, FeatureCollection, JsonObject};

/// 國名欄位沿用國界資料的屬性名稱
pub const NAME_COLUMN: &str = "NAME";

/// 每個 feature 共用的屬性：國名與三項指標
pub fn metric_properties(metrics: &CountryMetrics) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert(NAME_COLUMN.to_string(), metrics.name.clone().into());
    for metric in Metric::ALL {
        properties.insert(metric.key().to_string(), metric.value(metrics).into());
    }
    properties
}

pub fn to_feature_collection<F>(joined: &[JoinedRecord], mut extra: F) -> FeatureCollection
where
    F: FnMut(&JoinedRecord, &mut JsonObject),
{
    let features = joined
        .iter()
        .map(|record| {
            let mut properties = metric_properties(&record.metrics);
            extra(record, &mut properties);
            Feature {
                bbox: None,
                geometry: Some(record.geometry.clone()),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// 合併後的資料輸出成 GeoJSON
pub fn to_geojson(joined: &[JoinedRecord]) -> Result<String> {
    let collection = to_feature_collection(joined, |_, _| {});
    Ok(serde_json::to_string_pretty(&collection)?)
}

/// 合併後的指標表，一個國家一列
pub fn to_csv(joined: &[JoinedRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![NAME_COLUMN];
    header.extend(Metric::ALL.iter().map(|m| m.key()));
    writer.write_record(&header)?;

    for record in joined {
        let mut row = vec![record.name().to_string()];
        row.extend(
            Metric::ALL
                .iter()
                .map(|m| m.display(&record.metrics)),
        );
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| MapError::RenderError {
        message: format!("CSV flush failed: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| MapError::RenderError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
