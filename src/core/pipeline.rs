pub use crate::app::pipelines::map_pipeline::MapPipeline;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::domain::ports::{Pipeline, Storage};
    use crate::utils::error::{MapError, Result};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        /// 寫入這個路徑時回傳錯誤
        failing_write: Option<String>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                failing_write: None,
            }
        }

        fn failing_on(mut self, path: &str) -> Self {
            self.failing_write = Some(path.to_string());
            self
        }

        async fn put(&self, path: &str, content: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), content.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                MapError::file(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                )
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.failing_write.as_deref() == Some(path) {
                return Err(MapError::file(path, std::io::Error::other("disk full")));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn remove_file(&self, path: &str) -> Result<()> {
            let mut files = self.files.lock().await;
            files.remove(path);
            Ok(())
        }
    }

    const DATA: &str = r#"
Spain:
  flights_price: 50
  cost_living_index: 70
  cost_per_day: 80
Portugal:
  flights_price: 60
  cost_living_index: 65
  cost_per_day: 75
Atlantis:
  flights_price: 999
  cost_living_index: 200
  cost_per_day: 300
"#;

    const WORLD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"NAME": "Portugal"},
     "geometry": {"type": "Polygon", "coordinates": [[[-9.5, 37.0], [-6.2, 37.0], [-6.2, 42.1], [-9.5, 42.1], [-9.5, 37.0]]]}},
    {"type": "Feature", "properties": {"NAME": "Spain"},
     "geometry": {"type": "MultiPolygon", "coordinates": [[[[-9.3, 36.0], [3.3, 36.0], [3.3, 43.8], [-9.3, 43.8], [-9.3, 36.0]]], [[[1.2, 38.6], [4.3, 38.6], [4.3, 40.1], [1.2, 38.6]]]]}},
    {"type": "Feature", "properties": {"NAME": "France"},
     "geometry": {"type": "Polygon", "coordinates": [[[-4.8, 42.3], [8.2, 42.3], [8.2, 51.1], [-4.8, 42.3]]]}}
  ]
}"#;

    fn config(extra: &str) -> TomlConfig {
        let content = format!(
            r#"
[pipeline]
name = "pipeline-test"

[source]
data_path = "data.yml"
boundaries_path = "world.geojson"

[load]
output_path = "out/map.html"
{}
"#,
            extra
        );
        TomlConfig::from_toml_str(&content).unwrap()
    }

    async fn storage_with_inputs() -> MockStorage {
        let storage = MockStorage::new();
        storage.put("data.yml", DATA).await;
        storage.put("world.geojson", WORLD).await;
        storage
    }

    #[tokio::test]
    async fn test_extract_reads_both_inputs() {
        let pipeline = MapPipeline::new(storage_with_inputs().await, config(""));

        let dataset = pipeline.extract().await.unwrap();

        assert_eq!(dataset.records.len(), 3);
        assert_eq!(dataset.boundaries.len(), 3);
    }

    #[tokio::test]
    async fn test_transform_joins_and_reports_drops() {
        let pipeline = MapPipeline::new(storage_with_inputs().await, config(""));

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();

        let names: Vec<&str> = result.joined.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Portugal", "Spain"]);
        assert_eq!(result.report.missing_boundaries, vec!["Atlantis".to_string()]);
        assert_eq!(result.report.missing_records, vec!["France".to_string()]);
        // 色階只看合併後的資料，Atlantis 不影響值域
        assert_eq!(result.map.layers[0].max, 60.0);
        assert!(result.exports.is_empty());
    }

    #[tokio::test]
    async fn test_load_writes_map_and_exports() {
        let storage = storage_with_inputs().await;
        let pipeline = MapPipeline::new(
            storage.clone(),
            config("output_formats = [\"html\", \"csv\", \"geojson\"]"),
        );

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "out/map.html");
        let html = String::from_utf8(storage.get_file("out/map.html").await.unwrap()).unwrap();
        assert!(html.contains("L.control.layers("));

        let csv = String::from_utf8(storage.get_file("out/map.csv").await.unwrap()).unwrap();
        assert!(csv.contains("Spain,50,1.00,720.0"));
        assert!(storage.get_file("out/map.geojson").await.is_some());
    }

    #[tokio::test]
    async fn test_failed_map_write_removes_exports() {
        let storage = storage_with_inputs().await.failing_on("out/map.html");
        let pipeline = MapPipeline::new(
            storage.clone(),
            config("output_formats = [\"html\", \"csv\", \"geojson\"]"),
        );

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(err, MapError::FileError { ref path, .. } if path == "out/map.html"));
        assert!(storage.get_file("out/map.csv").await.is_none());
        assert!(storage.get_file("out/map.geojson").await.is_none());
        assert!(storage.get_file("out/map.html").await.is_none());
    }

    #[tokio::test]
    async fn test_output_path_colliding_with_export_is_rejected() {
        let storage = storage_with_inputs().await;
        let content = r#"
[pipeline]
name = "collision"

[source]
data_path = "data.yml"
boundaries_path = "world.geojson"

[load]
output_path = "out/map.csv"
output_formats = ["html", "csv"]
"#;
        let pipeline = MapPipeline::new(storage.clone(), TomlConfig::from_toml_str(content).unwrap());

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(
            err,
            MapError::InvalidConfigValueError { ref field, .. } if field == "output_path"
        ));
        assert!(storage.get_file("out/map.csv").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_data_file_is_io_error() {
        let storage = MockStorage::new();
        storage.put("world.geojson", WORLD).await;
        let pipeline = MapPipeline::new(storage, config(""));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, MapError::FileError { ref path, .. } if path == "data.yml"));
    }

    #[tokio::test]
    async fn test_no_matching_country_is_nothing_to_render() {
        let storage = MockStorage::new();
        storage
            .put(
                "data.yml",
                "Spain:\n  flights_price: 50\n  cost_living_index: 70\n  cost_per_day: 80\n",
            )
            .await;
        storage
            .put("world.geojson", r#"{"type": "FeatureCollection", "features": []}"#)
            .await;
        let pipeline = MapPipeline::new(storage, config(""));

        let dataset = pipeline.extract().await.unwrap();
        let err = pipeline.transform(dataset).await.unwrap_err();
        assert!(matches!(err, MapError::NothingToRenderError));
    }
}
