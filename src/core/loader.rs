use crate::core::normalize::to_number;
use crate::domain::model::{
    CellValue, ColumnLabels, CostColumns, CostTerm, RevenueColumns, RevenueLine, SkippedRowReport,
    SkippedRows, SourceTables,
};
use crate::domain::ports::SheetSource;
use crate::utils::error::{Result, SettleError};
use std::collections::BTreeMap;

type Row = Vec<CellValue>;

/// 讀取兩份來源中指定期間的工作表
pub fn load_sources(
    cost_source: &mut dyn SheetSource,
    revenue_source: &mut dyn SheetSource,
    period: &str,
    columns: &ColumnLabels,
) -> Result<SourceTables> {
    let (cost_terms, cost_skipped) = load_cost_terms(cost_source, period, &columns.cost)?;
    let (revenue_lines, revenue_skipped) =
        load_revenue_lines(revenue_source, period, &columns.revenue)?;

    Ok(SourceTables {
        cost_terms,
        revenue_lines,
        skipped: SkippedRowReport {
            cost: cost_skipped,
            revenue: revenue_skipped,
        },
    })
}

pub fn load_cost_terms(
    source: &mut dyn SheetSource,
    period: &str,
    columns: &CostColumns,
) -> Result<(BTreeMap<String, CostTerm>, SkippedRows)> {
    let (header, body) = read_period_sheet(source, period)?;
    let file = source.label();

    let idx_artist = column_index(&header, &columns.artist, file)?;
    let idx_rate = column_index(&header, &columns.rate, file)?;
    let idx_prior = column_index(&header, &columns.prior_balance, file)?;
    let idx_deduct = column_index(&header, &columns.current_deduction, file)?;
    let idx_remain = column_index(&header, &columns.remaining_balance, file)?;

    let mut terms = BTreeMap::new();
    let mut skipped = SkippedRows::default();

    for row in &body {
        if row.len() < header.len() {
            skipped.short_rows += 1;
            continue;
        }
        let artist = row[idx_artist].as_text().trim().to_string();
        if artist.is_empty() {
            skipped.blank_key_rows += 1;
            continue;
        }

        let term = CostTerm {
            rate_percent: to_number(&row[idx_rate]),
            prior_balance: to_number(&row[idx_prior]),
            current_deduction: to_number(&row[idx_deduct]),
            remaining_balance: to_number(&row[idx_remain]),
        };
        // 同名藝人以最後一列為準
        if terms.insert(artist.clone(), term).is_some() {
            tracing::debug!("[{}] duplicate cost row for '{}', keeping the last one", file, artist);
        }
    }

    tracing::debug!(
        "[{}] loaded {} cost terms ({} rows skipped)",
        file,
        terms.len(),
        skipped.total()
    );
    Ok((terms, skipped))
}

pub fn load_revenue_lines(
    source: &mut dyn SheetSource,
    period: &str,
    columns: &RevenueColumns,
) -> Result<(BTreeMap<String, Vec<RevenueLine>>, SkippedRows)> {
    let (header, body) = read_period_sheet(source, period)?;
    let file = source.label();

    let idx_artist = column_index(&header, &columns.album_artist, file)?;
    let idx_album = column_index(&header, &columns.album, file)?;
    let idx_major = column_index(&header, &columns.major_category, file)?;
    let idx_minor = column_index(&header, &columns.minor_category, file)?;
    let idx_service = column_index(&header, &columns.service, file)?;
    let idx_revenue = column_index(&header, &columns.net_revenue, file)?;

    let mut lines: BTreeMap<String, Vec<RevenueLine>> = BTreeMap::new();
    let mut skipped = SkippedRows::default();
    let mut line_count = 0usize;

    for row in &body {
        if row.len() < header.len() {
            skipped.short_rows += 1;
            continue;
        }
        let artist = row[idx_artist].as_text().trim().to_string();
        if artist.is_empty() {
            skipped.blank_key_rows += 1;
            continue;
        }

        lines.entry(artist).or_default().push(RevenueLine {
            album: row[idx_album].as_text(),
            major_category: row[idx_major].as_text(),
            minor_category: row[idx_minor].as_text(),
            service: row[idx_service].as_text(),
            net_revenue: to_number(&row[idx_revenue]),
        });
        line_count += 1;
    }

    tracing::debug!(
        "[{}] loaded {} revenue lines for {} artists ({} rows skipped)",
        file,
        line_count,
        lines.len(),
        skipped.total()
    );
    Ok((lines, skipped))
}

fn read_period_sheet(source: &mut dyn SheetSource, period: &str) -> Result<(Row, Vec<Row>)> {
    if !source.has_sheet(period) {
        return Err(SettleError::PeriodNotFound {
            file: source.label().to_string(),
            period: period.to_string(),
        });
    }

    let mut rows = source.read_sheet(period)?.into_iter();
    let header = rows.next().ok_or_else(|| SettleError::EmptySheet {
        file: source.label().to_string(),
        period: period.to_string(),
    })?;

    Ok((header, rows.collect()))
}

fn column_index(header: &[CellValue], label: &str, file: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.as_text() == label)
        .ok_or_else(|| SettleError::RequiredColumnMissing {
            file: file.to_string(),
            column: label.to_string(),
        })
}
