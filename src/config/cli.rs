use crate::core::Storage;
use crate::utils::error::{MapError, Result};
use std::path::{Path, PathBuf};

/// 本機檔案系統；相對路徑以 `base_path` 為起點，絕對路徑直接使用
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tokio::fs::read(&full_path)
            .await
            .map_err(|e| MapError::file(full_path.display().to_string(), e))
    }

    /// 先寫到同目錄的暫存檔再改名，失敗時目的檔不會只寫一半
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let display = full_path.display().to_string();

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| MapError::file(parent.display().to_string(), e))?;
            }
        }

        let mut temp_name = full_path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".partial");
        let temp_path = full_path.with_file_name(temp_name);

        if let Err(e) = tokio::fs::write(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(MapError::file(display, e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &full_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(MapError::file(display, e));
        }

        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        let full_path = self.resolve(path);
        match tokio::fs::remove_file(&full_path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(MapError::file(full_path.display().to_string(), e))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("out/map.html", b"<html></html>").await.unwrap();

        let data = storage.read_file("out/map.html").await.unwrap();
        assert_eq!(data, b"<html></html>");
        assert!(!temp_dir.path().join("out/map.html.partial").exists());
    }

    #[tokio::test]
    async fn test_remove_file_tolerates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("map.csv", b"NAME").await.unwrap();
        storage.remove_file("map.csv").await.unwrap();
        storage.remove_file("map.csv").await.unwrap();

        assert!(!temp_dir.path().join("map.csv").exists());
    }

    #[tokio::test]
    async fn test_missing_file_error_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        let err = storage.read_file("data.yml").await.unwrap_err();
        match err {
            MapError::FileError { path, .. } => assert!(path.ends_with("data.yml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
