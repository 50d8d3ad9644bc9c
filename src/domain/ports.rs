use crate::domain::model::{CellValue, ColumnLabels, RunSummary, SettlementBatch, SourceTables};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn cost_file(&self) -> &str;
    fn revenue_file(&self) -> &str;
    fn period(&self) -> &str;
    fn issue_date(&self) -> &str;
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> &str;
    fn contact_email(&self) -> &str;
    fn columns(&self) -> &ColumnLabels;
}

/// 以工作表名稱讀取的表格來源 (xlsx 活頁簿、CSV 目錄等)
pub trait SheetSource {
    /// 錯誤訊息中使用的來源名稱
    fn label(&self) -> &str;
    fn has_sheet(&self, name: &str) -> bool;
    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<SettlementBatch>;
    async fn load(&self, batch: SettlementBatch) -> Result<RunSummary>;
}
