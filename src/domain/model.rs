use crate::domain::document::ArtistDocuments;
use crate::domain::report::VerificationReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 試算表儲存格的原始值
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// 文字欄位使用的字串表示；整數值不帶小數點
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string().to_uppercase(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostTerm {
    pub rate_percent: f64,
    pub prior_balance: f64,
    pub current_deduction: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueLine {
    pub album: String,
    pub major_category: String,
    pub minor_category: String,
    pub service: String,
    pub net_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumAggregate {
    pub album: String,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub artist: String,
    pub total_service_revenue: f64,
    pub total_album_revenue: f64,
    pub deduction_applied_amount: f64,
    pub rate_percent: f64,
    pub final_amount: f64,
}

/// 來源表格的欄位名稱 (表頭文字需完全相符)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostColumns {
    pub artist: String,
    pub rate: String,
    pub prior_balance: String,
    pub current_deduction: String,
    pub remaining_balance: String,
}

impl Default for CostColumns {
    fn default() -> Self {
        Self {
            artist: "아티스트명".to_string(),
            rate: "정산 요율".to_string(),
            prior_balance: "전월 잔액".to_string(),
            current_deduction: "당월 차감액".to_string(),
            remaining_balance: "당월 잔액".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueColumns {
    pub album_artist: String,
    pub album: String,
    pub major_category: String,
    pub minor_category: String,
    pub service: String,
    pub net_revenue: String,
}

impl Default for RevenueColumns {
    fn default() -> Self {
        Self {
            album_artist: "앨범아티스트".to_string(),
            album: "앨범명".to_string(),
            major_category: "대분류".to_string(),
            minor_category: "중분류".to_string(),
            service: "서비스명".to_string(),
            net_revenue: "권리사정산금액".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub cost: CostColumns,
    pub revenue: RevenueColumns,
}

/// 讀取時略過的資料列數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkippedRows {
    pub short_rows: usize,
    pub blank_key_rows: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.short_rows + self.blank_key_rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkippedRowReport {
    pub cost: SkippedRows,
    pub revenue: SkippedRows,
}

/// extract 階段的輸出
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub cost_terms: BTreeMap<String, CostTerm>,
    pub revenue_lines: BTreeMap<String, Vec<RevenueLine>>,
    pub skipped: SkippedRowReport,
}

impl SourceTables {
    /// 兩張表的藝人聯集，依字典序排列
    pub fn artists(&self) -> Vec<String> {
        let mut artists: Vec<String> = self
            .cost_terms
            .keys()
            .chain(self.revenue_lines.keys())
            .cloned()
            .collect();
        artists.sort();
        artists.dedup();
        artists
    }
}

/// transform 階段的輸出
#[derive(Debug, Clone)]
pub struct SettlementBatch {
    pub period: String,
    pub documents: Vec<ArtistDocuments>,
    pub report: VerificationReport,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub artist_count: usize,
    pub report: VerificationReport,
}
