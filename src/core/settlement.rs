use crate::core::aggregate::RevenueSummary;
use crate::domain::model::{CostTerm, SettlementResult};

/// 百分比換算為比例
const PERCENT: f64 = 100.0;

/// 先扣除當月扣除額，再乘以結算比率。
///
/// 沒有成本資料時以全零計算；結果不四捨五入，負值也照原樣保留。
pub fn settle(artist: &str, cost: Option<&CostTerm>, revenue: &RevenueSummary) -> SettlementResult {
    let term = cost.copied().unwrap_or_default();

    let deduction_applied_amount = revenue.total_album_revenue - term.current_deduction;
    let final_amount = deduction_applied_amount * (term.rate_percent / PERCENT);

    SettlementResult {
        artist: artist.to_string(),
        total_service_revenue: revenue.total_service_revenue,
        total_album_revenue: revenue.total_album_revenue,
        deduction_applied_amount,
        rate_percent: term.rate_percent,
        final_amount,
    }
}
