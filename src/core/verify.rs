use crate::core::aggregate::summarize;
use crate::domain::document::StatementDocument;
use crate::domain::model::{CostTerm, RevenueLine};
use crate::domain::report::{CheckCategory, VerificationRecord, VerificationReport};

/// 數值比對的絕對容許誤差
pub const TOLERANCE: f64 = 1e-3;

pub fn almost_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

pub fn compare(
    category: CheckCategory,
    artist: &str,
    item: impl Into<String>,
    source_value: f64,
    statement_value: Option<f64>,
) -> VerificationRecord {
    let matched = statement_value.is_some_and(|v| almost_equal(source_value, v));
    VerificationRecord {
        category,
        artist: artist.to_string(),
        item: item.into(),
        source_value,
        statement_value,
        matched,
    }
}

/// 以來源資料重新推導結算單上的每個數值並寫入報告。
///
/// `lines` 必須是結算單使用的排序後明細。不符只會被記錄，不會中斷。
pub fn verify_statement(
    report: &mut VerificationReport,
    cost: Option<&CostTerm>,
    lines: &[RevenueLine],
    statement: &StatementDocument,
) {
    let artist = statement.artist.as_str();
    let source = cost.copied().unwrap_or_default();
    let mismatches_before = report.summary().total_errors;

    // 공제 내역
    let deduction = &statement.deduction;
    for (item, source_value, statement_value) in [
        ("prior_balance", source.prior_balance, deduction.prior_balance),
        ("current_deduction", source.current_deduction, deduction.current_deduction),
        ("remaining_balance", source.remaining_balance, deduction.remaining_balance),
    ] {
        report.push(compare(
            CheckCategory::Deduction,
            artist,
            item,
            source_value,
            Some(statement_value),
        ));
    }

    // 수익 배분율
    report.push(compare(
        CheckCategory::Rate,
        artist,
        "rate_percent",
        source.rate_percent,
        Some(statement.distribution.rate_percent),
    ));

    // 음원 서비스별 매출
    for (index, line) in lines.iter().enumerate() {
        let statement_value = statement
            .service_rows
            .get(index)
            .filter(|row| row.album == line.album && row.service == line.service)
            .map(|row| row.amount);
        report.push(compare(
            CheckCategory::LineRevenue,
            artist,
            format!("{} / {}", line.album, line.service),
            line.net_revenue,
            statement_value,
        ));
    }

    // 以與結算單相同的專輯小計累計順序重算總額
    let reference = summarize(lines);
    report.push(compare(
        CheckCategory::RevenueTotal,
        artist,
        "service_total",
        reference.total_service_revenue,
        Some(statement.service_total),
    ));
    report.push(compare(
        CheckCategory::RevenueTotal,
        artist,
        "album_total",
        reference.total_album_revenue,
        Some(statement.album_total),
    ));

    let new_mismatches = report.summary().total_errors - mismatches_before;
    if new_mismatches > 0 {
        tracing::warn!("⚠️ {} mismatches found in statement for '{}'", new_mismatches, artist);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settlement::settle;
    use crate::core::statement::{build_statement, StatementContext};

    fn line(album: &str, service: &str, revenue: f64) -> RevenueLine {
        RevenueLine {
            album: album.to_string(),
            major_category: "음원".to_string(),
            minor_category: "스트리밍".to_string(),
            service: service.to_string(),
            net_revenue: revenue,
        }
    }

    fn term() -> CostTerm {
        CostTerm {
            rate_percent: 50.0,
            prior_balance: 1000.0,
            current_deduction: 200.0,
            remaining_balance: 800.0,
        }
    }

    fn statement_for(cost: Option<&CostTerm>, lines: &[RevenueLine]) -> (Vec<RevenueLine>, StatementDocument) {
        let revenue = summarize(lines);
        let settlement = settle("X", cost, &revenue);
        let ctx = StatementContext {
            period: "202403",
            issue_date: "2024-04-10",
            contact_email: "help@xxxx.com",
        };
        let doc = build_statement(ctx, cost, &revenue, &settlement);
        (revenue.lines, doc)
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(almost_equal(100.0005, 100.0));
        assert!(!almost_equal(100.002, 100.0));

        let x = 1234.5678;
        assert!(compare(CheckCategory::Rate, "X", "rate", x, Some(x)).matched);
        assert!(!compare(CheckCategory::Rate, "X", "rate", x, Some(x + 2e-3)).matched);
        assert!(!compare(CheckCategory::Rate, "X", "rate", x, None).matched);
    }

    #[test]
    fn test_faithful_statement_has_no_mismatches() {
        let cost = term();
        let (lines, doc) = statement_for(
            Some(&cost),
            &[line("A1", "Melon", 1000.0), line("A1", "Genie", 2000.0)],
        );
        let mut report = VerificationReport::default();

        verify_statement(&mut report, Some(&cost), &lines, &doc);

        assert!(report.is_clean());
        assert_eq!(report.records_in(CheckCategory::Deduction).count(), 3);
        assert_eq!(report.records_in(CheckCategory::Rate).count(), 1);
        assert_eq!(report.records_in(CheckCategory::LineRevenue).count(), 2);
        assert_eq!(report.records_in(CheckCategory::RevenueTotal).count(), 2);
    }

    #[test]
    fn test_transcription_errors_are_recorded() {
        let cost = term();
        let (lines, mut doc) = statement_for(
            Some(&cost),
            &[line("A1", "Melon", 100.0), line("A1", "Genie", 100.0)],
        );
        doc.deduction.current_deduction = 250.0;
        doc.distribution.rate_percent = 45.0;
        doc.service_rows[1].amount = 100.002;
        let mut report = VerificationReport::default();

        verify_statement(&mut report, Some(&cost), &lines, &doc);

        assert_eq!(report.summary().total_errors, 3);
        assert_eq!(report.summary().artist_errors, vec!["X", "X", "X"]);
        assert_eq!(report.summary().distinct_artists(), vec!["X"]);
        let line_mismatch = report
            .mismatches()
            .find(|r| r.category == CheckCategory::LineRevenue)
            .unwrap();
        assert_eq!(line_mismatch.item, "A1 / Melon");
        assert_eq!(line_mismatch.statement_value, Some(100.002));
    }

    #[test]
    fn test_untouched_statement_with_large_magnitudes_is_clean() {
        let (lines, doc) = statement_for(
            None,
            &[
                line("X", "s1", 0.1),
                line("Y", "s1", 0.2),
                line("X", "s2", 0.3),
                line("Z", "s1", 1e16),
                line("Y", "s2", 0.7),
                line("Z", "s2", -1e16),
            ],
        );
        let mut report = VerificationReport::default();

        verify_statement(&mut report, None, &lines, &doc);

        assert!(report.is_clean(), "{:?}", report.mismatches().collect::<Vec<_>>());
        assert_eq!(report.records_in(CheckCategory::RevenueTotal).count(), 2);
    }

    #[test]
    fn test_tampered_total_is_recorded() {
        let (lines, mut doc) = statement_for(None, &[line("A1", "Melon", 10.0)]);
        doc.album_total = 11.0;
        let mut report = VerificationReport::default();

        verify_statement(&mut report, None, &lines, &doc);

        let mismatch: Vec<_> = report.mismatches().collect();
        assert_eq!(mismatch.len(), 1);
        assert_eq!(mismatch[0].category, CheckCategory::RevenueTotal);
        assert_eq!(mismatch[0].item, "album_total");
    }

    #[test]
    fn test_small_drift_within_tolerance_matches() {
        let (lines, mut doc) = statement_for(None, &[line("A1", "Melon", 100.0)]);
        doc.service_rows[0].amount = 100.0005;
        let mut report = VerificationReport::default();

        verify_statement(&mut report, None, &lines, &doc);

        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_statement_row_is_a_mismatch() {
        let (lines, mut doc) = statement_for(
            None,
            &[line("A1", "Melon", 10.0), line("A2", "Melon", 20.0)],
        );
        doc.service_rows.pop();
        let mut report = VerificationReport::default();

        verify_statement(&mut report, None, &lines, &doc);

        let missing: Vec<_> = report.mismatches().collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].item, "A2 / Melon");
        assert_eq!(missing[0].statement_value, None);
    }

    #[test]
    fn test_absent_cost_term_compares_against_zero() {
        let (lines, doc) = statement_for(None, &[line("A1", "Melon", 10.0)]);
        let mut report = VerificationReport::default();

        verify_statement(&mut report, None, &lines, &doc);

        assert!(report
            .records_in(CheckCategory::Deduction)
            .all(|r| r.source_value == 0.0 && r.matched));
    }
}
