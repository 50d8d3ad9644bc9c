use crate::domain::document::{DetailDocument, StatementDocument};
use crate::domain::model::{CellValue, SkippedRowReport};
use crate::domain::report::{ArtistComparison, VerificationReport};
use crate::utils::error::Result;
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;

pub const DETAIL_SHEET: &str = "세부매출내역";
pub const STATEMENT_SHEET: &str = "정산서";

fn text(value: impl Into<String>) -> CellValue {
    CellValue::Text(value.into())
}

fn number(value: f64) -> CellValue {
    // -0.0 顯示為 0
    if value == 0.0 {
        CellValue::Number(0.0)
    } else {
        CellValue::Number(value)
    }
}

/// 依欄位位置 (A = 0) 排版的工作表內容
#[derive(Debug, Default)]
struct SheetRows {
    rows: Vec<Vec<CellValue>>,
}

impl SheetRows {
    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    fn push<const N: usize>(&mut self, cells: [(usize, CellValue); N]) {
        let width = cells.iter().map(|(col, _)| col + 1).max().unwrap_or(0);
        let mut row = vec![CellValue::Empty; width];
        for (col, value) in cells {
            row[col] = value;
        }
        self.rows.push(row);
    }

    fn push_all(&mut self, cells: Vec<CellValue>) {
        self.rows.push(cells);
    }
}

fn write_workbook(sheet_name: &str, sheet: &SheetRows) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (r, row) in sheet.rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(r, c, s.as_str())?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// 세부매출내역 活頁簿
pub fn detail_workbook(doc: &DetailDocument) -> Result<Vec<u8>> {
    let mut sheet = SheetRows::default();
    sheet.push_all(
        ["앨범아티스트", "앨범명", "대분류", "중분류", "서비스명", "기간", "매출 순수익"]
            .into_iter()
            .map(text)
            .collect(),
    );

    for line in &doc.rows {
        sheet.push_all(vec![
            text(doc.artist.as_str()),
            text(line.album.as_str()),
            text(line.major_category.as_str()),
            text(line.minor_category.as_str()),
            text(line.service.as_str()),
            text(doc.period_label.as_str()),
            number(line.amount),
        ]);
    }

    sheet.push([(0, text("합계")), (6, number(doc.total))]);

    write_workbook(DETAIL_SHEET, &sheet)
}

/// 정산서 活頁簿，保留原報表的區塊順序與欄位位置 (A..H)
pub fn statement_workbook(doc: &StatementDocument) -> Result<Vec<u8>> {
    let mut sheet = SheetRows::default();

    sheet.blank();
    sheet.push([(7, text(doc.issue_line.as_str()))]);
    sheet.blank();
    sheet.push([(1, text(doc.sales_period_line.as_str()))]);
    sheet.blank();
    sheet.push([(1, text(doc.title.as_str()))]);
    sheet.blank();
    for (i, notice) in doc.notices.iter().enumerate() {
        if i + 1 == doc.notices.len() {
            sheet.push([
                (0, text("•")),
                (1, text(notice.as_str())),
                (5, text(doc.contact_line.as_str())),
            ]);
        } else {
            sheet.push([(0, text("•")), (1, text(notice.as_str()))]);
        }
    }
    sheet.blank();

    // 1. 음원 서비스별 정산내역
    sheet.push([(0, text("1.")), (1, text("음원 서비스별 정산내역"))]);
    sheet.push([
        (1, text("앨범")),
        (2, text("대분류")),
        (3, text("중분류")),
        (4, text("서비스명")),
        (5, text("기간")),
        (6, text("매출액")),
    ]);
    for line in &doc.service_rows {
        sheet.push([
            (1, text(line.album.as_str())),
            (2, text(line.major_category.as_str())),
            (3, text(line.minor_category.as_str())),
            (4, text(line.service.as_str())),
            (5, text(doc.period_label.as_str())),
            (6, number(line.amount)),
        ]);
    }
    sheet.blank();
    sheet.push([(1, text("합계")), (6, number(doc.service_total))]);
    sheet.blank();

    // 2. 앨범 별 정산 내역
    sheet.push([(0, text("2.")), (1, text("앨범 별 정산 내역"))]);
    sheet.push([(1, text("앨범")), (5, text("기간")), (6, text("매출액"))]);
    for album in &doc.album_rows {
        sheet.push([
            (1, text(album.album.as_str())),
            (5, text(doc.period_label.as_str())),
            (6, number(album.total_revenue)),
        ]);
    }
    sheet.push([(1, text("합계")), (6, number(doc.album_total))]);
    sheet.blank();

    // 3. 공제 내역
    let deduction = &doc.deduction;
    sheet.push([(0, text("3.")), (1, text("공제 내역"))]);
    sheet.push([
        (1, text("앨범")),
        (2, text("곡비")),
        (3, text("공제 금액")),
        (5, text("공제 후 남은 곡비")),
        (6, text("공제 적용 금액")),
    ]);
    sheet.push([
        (1, text(deduction.albums_label.as_str())),
        (2, number(deduction.prior_balance)),
        (3, number(deduction.current_deduction)),
        (5, number(deduction.remaining_balance)),
        (6, number(deduction.deduction_applied_amount)),
    ]);
    sheet.blank();

    // 4. 수익 배분
    let distribution = &doc.distribution;
    sheet.push([(0, text("4.")), (1, text("수익 배분"))]);
    sheet.push([
        (1, text("앨범")),
        (2, text("항목")),
        (3, text("적용율")),
        (6, text("적용 금액")),
    ]);
    sheet.push([
        (1, text(distribution.albums_label.as_str())),
        (2, text("수익 배분율")),
        (3, text(distribution.rate_label.as_str())),
        (6, number(distribution.amount)),
    ]);
    sheet.push([(1, text("총 정산금액")), (6, number(doc.total_amount))]);
    sheet.blank();
    sheet.push([(6, text(doc.footnote.as_str()))]);

    write_workbook(STATEMENT_SHEET, &sheet)
}

/// 壓縮檔內的檔名：路徑分隔字元與控制字元換成 `_`
pub fn safe_file_stem(artist: &str) -> String {
    artist
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\' | ':') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// 產生不重複的壓縮檔內檔名
#[derive(Debug, Default)]
pub struct EntryNames {
    used: HashSet<String>,
}

impl EntryNames {
    pub fn new() -> Self {
        Self::default()
    }

    fn unique(&mut self, stem: &str, suffix: &str) -> String {
        let mut name = format!("{}{}", stem, suffix);
        let mut n = 2;
        while self.used.contains(&name) {
            name = format!("{} ({}){}", stem, n, suffix);
            n += 1;
        }
        self.used.insert(name.clone());
        name
    }

    pub fn detail(&mut self, artist: &str) -> String {
        self.unique(&safe_file_stem(artist), "(세부매출내역).xlsx")
    }

    pub fn statement(&mut self, artist: &str) -> String {
        self.unique(&safe_file_stem(artist), "(정산서).xlsx")
    }
}

/// 兩張來源表的藝人比對與略過列數
pub fn render_comparison(comparison: &ArtistComparison, skipped: &SkippedRowReport) -> String {
    let mut lines = vec![
        "📋 Artist comparison:".to_string(),
        format!("  Cost table artists: {}", comparison.cost_count),
        format!("  Revenue table artists: {}", comparison.revenue_count),
        format!("  Common artists: {}", comparison.common_count),
    ];
    if !comparison.missing_in_cost.is_empty() {
        lines.push(format!(
            "  ⚠️ Only in revenue table: {}",
            comparison.missing_in_cost.join(", ")
        ));
    }
    if !comparison.missing_in_revenue.is_empty() {
        lines.push(format!(
            "  ⚠️ Only in cost table: {}",
            comparison.missing_in_revenue.join(", ")
        ));
    }
    if skipped.cost.total() + skipped.revenue.total() > 0 {
        lines.push(format!(
            "  ⚠️ Skipped rows: cost {} (short {}, blank artist {}), revenue {} (short {}, blank artist {})",
            skipped.cost.total(),
            skipped.cost.short_rows,
            skipped.cost.blank_key_rows,
            skipped.revenue.total(),
            skipped.revenue.short_rows,
            skipped.revenue.blank_key_rows,
        ));
    }

    lines.join("\n")
}

/// 終端機顯示用的驗證摘要
pub fn render_summary(report: &VerificationReport) -> String {
    let summary = report.summary();
    let mut lines = vec![render_comparison(
        report.artist_comparison(),
        report.skipped_rows(),
    )];

    lines.push("🔎 Verification:".to_string());
    if report.is_clean() {
        lines.push(format!(
            "  ✅ All {} checks matched (0 errors)",
            report.records().len()
        ));
    } else {
        lines.push(format!(
            "  ❌ {} mismatches in {} checks",
            summary.total_errors,
            report.records().len()
        ));
        lines.push(format!(
            "  Artists with errors: {}",
            summary.distinct_artists().join(", ")
        ));
        for record in report.mismatches() {
            lines.push(format!(
                "    [{}] {} / {}: source {} vs statement {}",
                record.category,
                record.artist,
                record.item,
                record.source_value,
                record
                    .statement_value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "(missing)".to_string())
            ));
        }
    }

    lines.join("\n")
}
