use crate::domain::model::{AlbumAggregate, SettlementResult};
use serde::Serialize;

/// 세부매출내역: 藝人的逐筆營收明細
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailDocument {
    pub artist: String,
    pub period_label: String,
    pub rows: Vec<StatementLine>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementLine {
    pub album: String,
    pub major_category: String,
    pub minor_category: String,
    pub service: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeductionBlock {
    pub albums_label: String,
    pub prior_balance: f64,
    pub current_deduction: f64,
    pub remaining_balance: f64,
    pub deduction_applied_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBlock {
    pub albums_label: String,
    pub rate_percent: f64,
    pub rate_label: String,
    pub amount: f64,
}

/// 정산서: 寫入報表前的結算單內容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementDocument {
    pub artist: String,
    pub issue_line: String,
    pub sales_period_line: String,
    pub title: String,
    pub notices: Vec<String>,
    pub contact_line: String,
    pub period_label: String,
    pub service_rows: Vec<StatementLine>,
    pub service_total: f64,
    pub album_rows: Vec<AlbumAggregate>,
    pub album_total: f64,
    pub deduction: DeductionBlock,
    pub distribution: DistributionBlock,
    pub total_amount: f64,
    pub footnote: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDocuments {
    pub artist: String,
    pub settlement: SettlementResult,
    pub detail: DetailDocument,
    pub statement: StatementDocument,
}
