use crate::domain::model::CellValue;
use crate::domain::ports::SheetSource;
use crate::utils::error::{Result, SettleError};
use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// 依路徑開啟來源：目錄視為 CSV 目錄，其餘以 xlsx 活頁簿開啟
pub fn open_source(path: &str) -> Result<Box<dyn SheetSource>> {
    let path = Path::new(path);
    if path.is_dir() {
        tracing::debug!("Opening CSV directory source: {}", path.display());
        Ok(Box::new(CsvDirSource::new(path)))
    } else {
        tracing::debug!("Opening workbook source: {}", path.display());
        Ok(Box::new(XlsxSource::open(path)?))
    }
}

fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct XlsxSource {
    label: String,
    workbook: Xlsx<BufReader<File>>,
}

impl XlsxSource {
    pub fn open(path: &Path) -> Result<Self> {
        let label = source_label(path);
        let workbook: Xlsx<_> =
            open_workbook(path).map_err(|e: XlsxError| SettleError::WorkbookError {
                file: label.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { label, workbook })
    }
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

impl SheetSource for XlsxSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.workbook.sheet_names().iter().any(|sheet| sheet == name)
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| SettleError::WorkbookError {
                file: self.label.clone(),
                message: e.to_string(),
            })?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect())
    }
}

/// 每個期間一個 `<YYYYMM>.csv` 檔的目錄
pub struct CsvDirSource {
    label: String,
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: &Path) -> Self {
        Self {
            label: source_label(dir),
            dir: dir.to_path_buf(),
        }
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }

    fn read_error(&self, e: csv::Error) -> SettleError {
        SettleError::WorkbookError {
            file: self.label.clone(),
            message: e.to_string(),
        }
    }
}

impl SheetSource for CsvDirSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_path(name).is_file()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(self.sheet_path(name))
            .map_err(|e| self.read_error(e))?;

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.read_error(e))?;
            let row: Vec<CellValue> = record
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    // Excel 匯出的 CSV 可能帶 BOM
                    let field = if rows.is_empty() && i == 0 {
                        field.trim_start_matches('\u{feff}')
                    } else {
                        field
                    };
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

/// 記憶體中的活頁簿，供測試與嵌入呼叫使用
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    label: String,
    sheets: Vec<(String, Vec<Vec<CellValue>>)>,
}

impl MemorySource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        self.sheets.push((name.into(), rows));
        self
    }
}

impl SheetSource for MemorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|(sheet, _)| sheet == name)
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<CellValue>>> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| SettleError::PeriodNotFound {
                file: self.label.clone(),
                period: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_csv_dir_source_reads_period_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("202403.csv"),
            "\u{feff}아티스트명,정산 요율\nX,50%\n,\nY\n",
        )
        .unwrap();

        let mut source = CsvDirSource::new(dir.path());
        assert!(source.has_sheet("202403"));
        assert!(!source.has_sheet("202404"));

        let rows = source.read_sheet("202403").unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], CellValue::Text("아티스트명".to_string()));
        assert_eq!(rows[1][1], CellValue::Text("50%".to_string()));
        assert_eq!(rows[2], vec![CellValue::Empty, CellValue::Empty]);
        assert_eq!(rows[3].len(), 1);
    }

    #[test]
    fn test_csv_read_errors_name_the_source() {
        let dir = TempDir::new().unwrap();
        let source_dir = dir.path().join("revenue");
        std::fs::create_dir_all(&source_dir).unwrap();
        // CP949 編碼的 "음원"
        std::fs::write(source_dir.join("202403.csv"), b"a,b\n\xc0\xbd\xbf\xf8,1\n").unwrap();

        let mut source = CsvDirSource::new(&source_dir);
        let err = source.read_sheet("202403").unwrap_err();

        match &err {
            SettleError::WorkbookError { file, .. } => assert_eq!(file, "revenue"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("[revenue]"));
    }

    #[test]
    fn test_open_source_rejects_non_workbook_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cost.xlsx");
        std::fs::write(&path, b"not a zip file").unwrap();

        let err = open_source(path.to_str().unwrap()).err().unwrap();
        match err {
            SettleError::WorkbookError { file, .. } => assert_eq!(file, "cost.xlsx"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_open_source_uses_directory_as_csv_source() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("202403.csv"), "a,b\n").unwrap();

        let source = open_source(dir.path().to_str().unwrap()).unwrap();
        assert!(source.has_sheet("202403"));
    }

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new("mem")
            .with_sheet("202403", vec![vec![CellValue::Number(1.0)]]);

        assert_eq!(source.label(), "mem");
        assert!(source.has_sheet("202403"));
        assert_eq!(source.read_sheet("202403").unwrap().len(), 1);
        assert!(source.read_sheet("202404").is_err());
    }
}
