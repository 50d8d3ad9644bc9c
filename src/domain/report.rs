use crate::domain::model::SkippedRowReport;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// 兩張來源表的藝人名單比對結果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ArtistComparison {
    pub cost_count: usize,
    pub revenue_count: usize,
    pub common_count: usize,
    /// 只出現在營收表
    pub missing_in_cost: Vec<String>,
    /// 只出現在成本表
    pub missing_in_revenue: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    Deduction,
    Rate,
    LineRevenue,
    RevenueTotal,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckCategory::Deduction => "deduction",
            CheckCategory::Rate => "rate",
            CheckCategory::LineRevenue => "line_revenue",
            CheckCategory::RevenueTotal => "revenue_total",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationRecord {
    pub category: CheckCategory,
    pub artist: String,
    pub item: String,
    pub source_value: f64,
    /// 結算單上找不到對應值時為 None
    pub statement_value: Option<f64>,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VerificationSummary {
    pub total_errors: usize,
    /// 每筆不符都會加入一次，顯示時再去重
    pub artist_errors: Vec<String>,
}

impl VerificationSummary {
    pub fn distinct_artists(&self) -> Vec<String> {
        self.artist_errors
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// 單次執行的驗證結果，只能附加
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VerificationReport {
    artist_comparison: ArtistComparison,
    skipped_rows: SkippedRowReport,
    summary: VerificationSummary,
    records: Vec<VerificationRecord>,
}

impl VerificationReport {
    pub fn new(artist_comparison: ArtistComparison, skipped_rows: SkippedRowReport) -> Self {
        Self {
            artist_comparison,
            skipped_rows,
            ..Self::default()
        }
    }

    pub fn push(&mut self, record: VerificationRecord) {
        if !record.matched {
            self.summary.total_errors += 1;
            self.summary.artist_errors.push(record.artist.clone());
        }
        self.records.push(record);
    }

    pub fn artist_comparison(&self) -> &ArtistComparison {
        &self.artist_comparison
    }

    pub fn skipped_rows(&self) -> &SkippedRowReport {
        &self.skipped_rows
    }

    pub fn summary(&self) -> &VerificationSummary {
        &self.summary
    }

    pub fn records(&self) -> &[VerificationRecord] {
        &self.records
    }

    pub fn records_in(&self, category: CheckCategory) -> impl Iterator<Item = &VerificationRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &VerificationRecord> {
        self.records.iter().filter(|r| !r.matched)
    }

    pub fn is_clean(&self) -> bool {
        self.summary.total_errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(artist: &str, matched: bool) -> VerificationRecord {
        VerificationRecord {
            category: CheckCategory::LineRevenue,
            artist: artist.to_string(),
            item: "A1 / Melon".to_string(),
            source_value: 10.0,
            statement_value: Some(if matched { 10.0 } else { 12.0 }),
            matched,
        }
    }

    #[test]
    fn test_push_counts_only_mismatches() {
        let mut report = VerificationReport::default();
        report.push(record("X", true));
        report.push(record("Y", false));
        report.push(record("Y", false));
        report.push(record("B", false));

        assert_eq!(report.records().len(), 4);
        assert_eq!(report.summary().total_errors, 3);
        assert_eq!(report.summary().artist_errors, vec!["Y", "Y", "B"]);
        assert_eq!(report.summary().distinct_artists(), vec!["B", "Y"]);
        assert_eq!(report.mismatches().count(), 3);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = VerificationReport::new(ArtistComparison::default(), SkippedRowReport::default());
        assert!(report.is_clean());
        assert!(report.summary().distinct_artists().is_empty());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&CheckCategory::LineRevenue).unwrap();
        assert_eq!(json, "\"line_revenue\"");
        assert_eq!(CheckCategory::RevenueTotal.to_string(), "revenue_total");
    }
}
