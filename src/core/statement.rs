use crate::core::aggregate::RevenueSummary;
use crate::domain::document::{
    DeductionBlock, DetailDocument, DistributionBlock, StatementDocument, StatementLine,
};
use crate::domain::model::{CostTerm, RevenueLine, SettlementResult};

pub const VAT_NOTE: &str = "* 부가세 별도";

/// 結算單上固定的期間與發行資訊
#[derive(Debug, Clone, Copy)]
pub struct StatementContext<'a> {
    pub period: &'a str,
    pub issue_date: &'a str,
    pub contact_email: &'a str,
}

/// `202403` -> (`2024`, `03`)
fn split_period(period: &str) -> (&str, &str) {
    match (period.get(..4), period.get(4..)) {
        (Some(year), Some(month)) => (year, month),
        _ => (period, ""),
    }
}

pub fn period_label(period: &str) -> String {
    let (year, month) = split_period(period);
    format!("{}년 {}월", year, month)
}

fn statement_line(line: &RevenueLine) -> StatementLine {
    StatementLine {
        album: line.album.clone(),
        major_category: line.major_category.clone(),
        minor_category: line.minor_category.clone(),
        service: line.service.clone(),
        amount: line.net_revenue,
    }
}

pub fn build_detail(artist: &str, period: &str, revenue: &RevenueSummary) -> DetailDocument {
    DetailDocument {
        artist: artist.to_string(),
        period_label: period_label(period),
        rows: revenue.lines.iter().map(statement_line).collect(),
        total: revenue.total_service_revenue,
    }
}

pub fn build_statement(
    ctx: StatementContext<'_>,
    cost: Option<&CostTerm>,
    revenue: &RevenueSummary,
    settlement: &SettlementResult,
) -> StatementDocument {
    let artist = settlement.artist.as_str();
    let (year, month) = split_period(ctx.period);
    let term = cost.copied().unwrap_or_default();
    let albums_label = revenue.albums_label();

    StatementDocument {
        artist: artist.to_string(),
        issue_line: format!("{} 발행", ctx.issue_date),
        sales_period_line: format!("{}년 {}월 판매분", year, month),
        title: format!("{}님 음원 정산 내역서", artist),
        notices: vec![
            "저희와 함께해 주셔서 정말 감사하고, 앞으로도 잘 부탁드립니다!".to_string(),
            format!("{}년 {}월 음원 수익을 아래와 같이 정산드립니다.", year, month),
            "정산 관련 문의사항이 있다면 언제든 편히 연락주세요!".to_string(),
        ],
        contact_line: format!("E-mail: {}", ctx.contact_email),
        period_label: period_label(ctx.period),
        service_rows: revenue.lines.iter().map(statement_line).collect(),
        service_total: settlement.total_service_revenue,
        album_rows: revenue.albums.clone(),
        album_total: settlement.total_album_revenue,
        deduction: DeductionBlock {
            albums_label: albums_label.clone(),
            prior_balance: term.prior_balance,
            current_deduction: term.current_deduction,
            remaining_balance: term.remaining_balance,
            deduction_applied_amount: settlement.deduction_applied_amount,
        },
        distribution: DistributionBlock {
            albums_label,
            rate_percent: settlement.rate_percent,
            rate_label: format!("{}%", settlement.rate_percent),
            amount: settlement.final_amount,
        },
        total_amount: settlement.final_amount,
        footnote: VAT_NOTE.to_string(),
    }
}
