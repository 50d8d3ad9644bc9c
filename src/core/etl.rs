use crate::core::Pipeline;
use crate::domain::model::RunSummary;
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

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting settlement run");
        self.monitor.log_stats("start");

        // Extract
        tracing::info!("📥 Extracting source tables...");
        let tables = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} cost terms, revenue lines for {} artists",
            tables.cost_terms.len(),
            tables.revenue_lines.len()
        );
        self.monitor.log_stats("extract");

        // Transform
        tracing::info!("🔄 Settling artists...");
        let batch = self.pipeline.transform(tables).await?;
        tracing::info!(
            "Settled {} artists, {} verification errors",
            batch.documents.len(),
            batch.report.summary().total_errors
        );
        self.monitor.log_stats("transform");

        // Load
        tracing::info!("💾 Writing archive...");
        let summary = self.pipeline.load(batch).await?;
        tracing::info!("📁 Output saved to: {}", summary.output_path);
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
