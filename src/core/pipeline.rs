use crate::adapters::render::{detail_workbook, statement_workbook, EntryNames};
use crate::adapters::workbook::open_source;
use crate::core::aggregate::summarize;
use crate::core::loader::load_sources;
use crate::core::reconcile::compare_artists;
use crate::core::settlement::settle;
use crate::core::statement::{build_detail, build_statement, StatementContext};
use crate::core::verify::verify_statement;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::document::ArtistDocuments;
use crate::domain::model::{RunSummary, SettlementBatch, SourceTables};
use crate::domain::report::VerificationReport;
use crate::utils::error::Result;
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const REPORT_FILE_NAME: &str = "verification.json";

pub struct SettlementPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SettlementPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

/// 將所有藝人的報表與驗證報告打包成 ZIP
pub fn build_archive(batch: &SettlementBatch) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let mut names = EntryNames::new();

    for docs in &batch.documents {
        zip.start_file(names.detail(&docs.artist), options)?;
        zip.write_all(&detail_workbook(&docs.detail)?)?;

        zip.start_file(names.statement(&docs.artist), options)?;
        zip.write_all(&statement_workbook(&docs.statement)?)?;
    }

    zip.start_file(REPORT_FILE_NAME, options)?;
    let json_data = serde_json::to_string_pretty(&batch.report)?;
    zip.write_all(json_data.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SettlementPipeline<S, C> {
    async fn extract(&self) -> Result<SourceTables> {
        let period = self.config.period();
        tracing::info!("📥 Reading sheet '{}' from both sources", period);

        let mut cost_source = open_source(self.config.cost_file())?;
        let mut revenue_source = open_source(self.config.revenue_file())?;
        let tables = load_sources(
            cost_source.as_mut(),
            revenue_source.as_mut(),
            period,
            self.config.columns(),
        )?;

        let skipped = tables.skipped;
        if skipped.cost.total() > 0 {
            tracing::warn!(
                "⚠️ [{}] skipped {} rows ({} short, {} without artist)",
                cost_source.label(),
                skipped.cost.total(),
                skipped.cost.short_rows,
                skipped.cost.blank_key_rows
            );
        }
        if skipped.revenue.total() > 0 {
            tracing::warn!(
                "⚠️ [{}] skipped {} rows ({} short, {} without artist)",
                revenue_source.label(),
                skipped.revenue.total(),
                skipped.revenue.short_rows,
                skipped.revenue.blank_key_rows
            );
        }

        Ok(tables)
    }

    async fn transform(&self, tables: SourceTables) -> Result<SettlementBatch> {
        let period = self.config.period();
        let comparison = compare_artists(
            tables.cost_terms.keys().map(String::as_str),
            tables.revenue_lines.keys().map(String::as_str),
        );
        if !comparison.missing_in_cost.is_empty() {
            tracing::warn!(
                "⚠️ Artists only in revenue table: {:?}",
                comparison.missing_in_cost
            );
        }
        if !comparison.missing_in_revenue.is_empty() {
            tracing::warn!(
                "⚠️ Artists only in cost table: {:?}",
                comparison.missing_in_revenue
            );
        }

        let mut report = VerificationReport::new(comparison, tables.skipped);
        let ctx = StatementContext {
            period,
            issue_date: self.config.issue_date(),
            contact_email: self.config.contact_email(),
        };

        let artists = tables.artists();
        let total = artists.len();
        let mut documents = Vec::with_capacity(total);

        for (i, artist) in artists.into_iter().enumerate() {
            tracing::info!("[{}/{}] Processing {}", i + 1, total, artist);

            let cost = tables.cost_terms.get(&artist);
            let lines = tables
                .revenue_lines
                .get(&artist)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let revenue = summarize(lines);
            let settlement = settle(&artist, cost, &revenue);
            let detail = build_detail(&artist, period, &revenue);
            let statement = build_statement(ctx, cost, &revenue, &settlement);
            verify_statement(&mut report, cost, &revenue.lines, &statement);

            tracing::debug!(
                "{}: revenue {} - deduction -> {} x {}% = {}",
                artist,
                settlement.total_album_revenue,
                settlement.deduction_applied_amount,
                settlement.rate_percent,
                settlement.final_amount
            );

            documents.push(ArtistDocuments {
                artist,
                settlement,
                detail,
                statement,
            });
        }

        Ok(SettlementBatch {
            period: period.to_string(),
            documents,
            report,
        })
    }

    async fn load(&self, batch: SettlementBatch) -> Result<RunSummary> {
        let archive_name = self.config.archive_name();
        let output_path = Path::new(self.config.output_path())
            .join(archive_name)
            .display()
            .to_string();

        tracing::debug!(
            "Creating ZIP file with {} files",
            batch.documents.len() * 2 + 1
        );
        let zip_data = build_archive(&batch)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(archive_name, &zip_data).await?;

        Ok(RunSummary {
            output_path,
            artist_count: batch.documents.len(),
            report: batch.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ColumnLabels, CostTerm, RevenueLine};
    use crate::domain::report::CheckCategory;
    use crate::utils::error::SettleError;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        cost_file: String,
        revenue_file: String,
        columns: ColumnLabels,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                cost_file: "missing-cost.xlsx".to_string(),
                revenue_file: "missing-revenue.xlsx".to_string(),
                columns: ColumnLabels::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn cost_file(&self) -> &str {
            &self.cost_file
        }

        fn revenue_file(&self) -> &str {
            &self.revenue_file
        }

        fn period(&self) -> &str {
            "202403"
        }

        fn issue_date(&self) -> &str {
            "2024-04-10"
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn archive_name(&self) -> &str {
            "settlement.zip"
        }

        fn contact_email(&self) -> &str {
            "help@xxxx.com"
        }

        fn columns(&self) -> &ColumnLabels {
            &self.columns
        }
    }

    fn line(album: &str, service: &str, revenue: f64) -> RevenueLine {
        RevenueLine {
            album: album.to_string(),
            major_category: "음원".to_string(),
            minor_category: "스트리밍".to_string(),
            service: service.to_string(),
            net_revenue: revenue,
        }
    }

    fn sample_tables() -> SourceTables {
        let mut tables = SourceTables::default();
        tables.cost_terms.insert(
            "X".to_string(),
            CostTerm {
                rate_percent: 50.0,
                prior_balance: 1000.0,
                current_deduction: 200.0,
                remaining_balance: 800.0,
            },
        );
        tables.cost_terms.insert(
            "CostOnly".to_string(),
            CostTerm {
                rate_percent: 40.0,
                ..CostTerm::default()
            },
        );
        tables.revenue_lines.insert(
            "X".to_string(),
            vec![line("A1", "Melon", 1000.0), line("A1", "Genie", 2000.0)],
        );
        tables
            .revenue_lines
            .insert("RevenueOnly".to_string(), vec![line("B1", "Bugs", 500.0)]);
        tables
    }

    #[tokio::test]
    async fn test_transform_settles_every_artist_in_order() {
        let pipeline = SettlementPipeline::new(MockStorage::new(), MockConfig::new());

        let batch = pipeline.transform(sample_tables()).await.unwrap();

        let artists: Vec<&str> = batch.documents.iter().map(|d| d.artist.as_str()).collect();
        assert_eq!(artists, vec!["CostOnly", "RevenueOnly", "X"]);

        let x = &batch.documents[2].settlement;
        assert_eq!(x.total_album_revenue, 3000.0);
        assert_eq!(x.deduction_applied_amount, 2800.0);
        assert_eq!(x.final_amount, 1400.0);

        let revenue_only = &batch.documents[1].settlement;
        assert_eq!(revenue_only.rate_percent, 0.0);
        assert_eq!(revenue_only.final_amount, 0.0);

        let cost_only = &batch.documents[0];
        assert!(cost_only.detail.rows.is_empty());
        assert_eq!(cost_only.statement.deduction.albums_label, "(앨범 없음)");

        let comparison = batch.report.artist_comparison();
        assert_eq!(comparison.missing_in_cost, vec!["RevenueOnly"]);
        assert_eq!(comparison.missing_in_revenue, vec!["CostOnly"]);
        assert!(batch.report.is_clean());
    }

    #[tokio::test]
    async fn test_report_records_follow_artist_order() {
        let pipeline = SettlementPipeline::new(MockStorage::new(), MockConfig::new());

        let batch = pipeline.transform(sample_tables()).await.unwrap();

        let order: Vec<&str> = batch
            .report
            .records_in(CheckCategory::Rate)
            .map(|r| r.artist.as_str())
            .collect();
        assert_eq!(order, vec!["CostOnly", "RevenueOnly", "X"]);
        assert_eq!(batch.report.records_in(CheckCategory::LineRevenue).count(), 3);
    }

    #[tokio::test]
    async fn test_load_writes_archive() {
        let storage = MockStorage::new();
        let pipeline = SettlementPipeline::new(storage.clone(), MockConfig::new());
        let batch = pipeline.transform(sample_tables()).await.unwrap();

        let summary = pipeline.load(batch).await.unwrap();

        assert_eq!(summary.artist_count, 3);
        assert!(summary.output_path.ends_with("settlement.zip"));

        let zip_bytes = storage.get_file("settlement.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        assert_eq!(archive.len(), 7);

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(
            file_names,
            vec![
                "CostOnly(세부매출내역).xlsx",
                "CostOnly(정산서).xlsx",
                "RevenueOnly(세부매출내역).xlsx",
                "RevenueOnly(정산서).xlsx",
                "X(세부매출내역).xlsx",
                "X(정산서).xlsx",
                "verification.json",
            ]
        );

        let mut json = String::new();
        archive
            .by_name(REPORT_FILE_NAME)
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total_errors"], 0);
        assert_eq!(value["artist_comparison"]["common_count"], 1);
    }

    #[tokio::test]
    async fn test_extract_fails_on_unreadable_source() {
        let pipeline = SettlementPipeline::new(MockStorage::new(), MockConfig::new());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SettleError::WorkbookError { .. }));
    }
}
