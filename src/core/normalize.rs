use crate::domain::model::CellValue;

/// 將儲存格轉成數值。
///
/// 空值與無法解析的文字一律視為 `0.0`，不回報錯誤；輸入錯誤不會在這裡被攔下。
pub fn to_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Empty => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        CellValue::Text(s) => parse_numeric_text(s),
    }
}

fn parse_numeric_text(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    let cleaned: String = raw.chars().filter(|c| *c != '%' && *c != ',').collect();
    cleaned.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_percent_and_thousands_separator() {
        assert_eq!(to_number(&text("12,500.5%")), 12500.5);
        assert_eq!(to_number(&text("50%")), 50.0);
        assert_eq!(to_number(&text("1,000")), 1000.0);
    }

    #[test]
    fn test_blank_values_are_zero() {
        assert_eq!(to_number(&CellValue::Empty), 0.0);
        assert_eq!(to_number(&text("")), 0.0);
        assert_eq!(to_number(&CellValue::Bool(false)), 0.0);
    }

    #[test]
    fn test_malformed_text_falls_back_to_zero() {
        assert_eq!(to_number(&text("abc")), 0.0);
        assert_eq!(to_number(&text("12.3.4")), 0.0);
        assert_eq!(to_number(&text("%")), 0.0);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(to_number(&CellValue::Number(-3.25)), -3.25);
        assert_eq!(to_number(&text(" 42 ")), 42.0);
        assert_eq!(to_number(&text("-7.5")), -7.5);
        assert_eq!(to_number(&CellValue::Bool(true)), 1.0);
    }
}
