use crate::core::export::{to_csv, to_geojson};
use crate::core::join::join_boundaries;
use crate::core::loader::{parse_boundaries, parse_country_records};
use crate::core::render::{render_map, Captions, RenderOptions};
use crate::core::transform::{compute_metrics, TransformSettings};
use crate::core::{ConfigProvider, Dataset, Pipeline, Storage, TransformResult};
use crate::domain::model::{Export, OutputFormat};
use crate::utils::error::{MapError, Result};
use std::path::Path;

/// 旅費地圖 Pipeline：讀資料與國界、計算指標、合併、輸出地圖
pub struct MapPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> MapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn transform_settings(&self) -> TransformSettings {
        TransformSettings {
            trip_length_days: self.config.trip_length_days(),
            reference_country: self.config.reference_country().to_string(),
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: self.config.map_title().to_string(),
            tiles_url: self.config.tiles_url().to_string(),
            tiles_attribution: self.config.tiles_attribution().to_string(),
            captions: Captions::new(
                self.config.flight_caption(),
                self.config.currency(),
                self.config.trip_length_days(),
            ),
            generated_at: chrono::Utc::now(),
        }
    }

    /// 後續寫入失敗時刪掉已寫好的附加檔案，不留下不完整的輸出
    async fn rollback(&self, written: &[&str]) {
        for path in written {
            if let Err(e) = self.storage.remove_file(path).await {
                tracing::warn!("⚠️ Could not remove partial output {}: {}", path, e);
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MapPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let data_path = self.config.data_path();
        tracing::debug!("Reading country records from {}", data_path);
        let data = self.storage.read_file(data_path).await?;
        let records = parse_country_records(data_path, &data)?;

        let boundaries_path = self.config.boundaries_path();
        tracing::debug!("Reading boundaries from {}", boundaries_path);
        let world = self.storage.read_file(boundaries_path).await?;
        let boundaries = parse_boundaries(boundaries_path, &world, self.config.name_property())?;

        if boundaries.skipped > 0 {
            tracing::warn!(
                "⚠️ Skipped {} boundary features without a usable name or polygon",
                boundaries.skipped
            );
        }

        Ok(Dataset {
            records,
            boundaries: boundaries.records,
        })
    }

    async fn transform(&self, data: Dataset) -> Result<TransformResult> {
        let metrics = compute_metrics(&data.records, &self.transform_settings())?;

        let outcome = join_boundaries(&metrics, &data.boundaries);
        if !outcome.report.missing_boundaries.is_empty() {
            tracing::warn!(
                "⚠️ {} countries have no boundary and were dropped: {}",
                outcome.report.missing_boundaries.len(),
                outcome.report.missing_boundaries.join(", ")
            );
        }
        tracing::debug!(
            "{} boundaries have no country record",
            outcome.report.missing_records.len()
        );

        let map = render_map(&outcome.joined, &self.render_options())?;

        let mut exports = Vec::new();
        for format in self.config.output_formats() {
            let content = match format {
                OutputFormat::Html => continue,
                OutputFormat::Csv => to_csv(&outcome.joined)?,
                OutputFormat::Geojson => to_geojson(&outcome.joined)?,
            };
            exports.push(Export {
                format: *format,
                content,
            });
        }

        Ok(TransformResult {
            joined: outcome.joined,
            report: outcome.report,
            map,
            exports,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        // 附加檔案放在地圖旁邊，只換副檔名
        let mut planned = Vec::with_capacity(result.exports.len());
        for export in &result.exports {
            let path = Path::new(output_path)
                .with_extension(export.format.extension())
                .to_string_lossy()
                .into_owned();
            if path == output_path {
                return Err(MapError::InvalidConfigValueError {
                    field: "output_path".to_string(),
                    value: output_path.to_string(),
                    reason: format!("collides with the {} export", export.format),
                });
            }
            planned.push((path, export));
        }

        let mut written: Vec<&str> = Vec::with_capacity(planned.len());
        for (path, export) in &planned {
            tracing::debug!("Writing {} export to {}", export.format, path);
            if let Err(e) = self.storage.write_file(path, export.content.as_bytes()).await {
                self.rollback(&written).await;
                return Err(e);
            }
            written.push(path);
        }

        tracing::debug!(
            "Writing map ({} bytes) to {}",
            result.map.html.len(),
            output_path
        );
        if let Err(e) = self
            .storage
            .write_file(output_path, result.map.html.as_bytes())
            .await
        {
            self.rollback(&written).await;
            return Err(e);
        }

        Ok(output_path.to_string())
    }
}
