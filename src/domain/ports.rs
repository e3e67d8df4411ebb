use crate::domain::model::{Dataset, OutputFormat, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 撤回已寫入的檔案；檔案不存在時視為成功
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn boundaries_path(&self) -> &str;
    /// 邊界資料中存放國名的屬性
    fn name_property(&self) -> &str;
    fn trip_length_days(&self) -> u32;
    fn reference_country(&self) -> &str;
    fn output_path(&self) -> &str;
    /// 除了 HTML 以外要另外輸出的格式
    fn output_formats(&self) -> &[OutputFormat];
    fn map_title(&self) -> &str;
    fn currency(&self) -> &str;
    fn flight_caption(&self) -> String;
    fn tiles_url(&self) -> &str;
    fn tiles_attribution(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
