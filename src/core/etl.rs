use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行 extract、transform、load，任何一步失敗就中止
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting map generation");
        self.monitor.log_stats("Start");

        tracing::info!("📥 Loading data...");
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} country records and {} boundaries",
            dataset.records.len(),
            dataset.boundaries.len()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("🔄 Transforming and rendering...");
        let result = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Rendered {} layers over {} countries ({} names dropped by the join)",
            result.map.layers.len(),
            result.joined.len(),
            result.report.dropped_count()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("💾 Writing output...");
        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
