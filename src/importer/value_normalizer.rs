// ==========================================
// 清货清单分析 - 单元格数值标准化
// ==========================================
// 职责: 货币字符串 / 字节串 / 数值 → NormalizedValue
// 规则: 最大限度宽容，永不报错；单个脏单元格只贡献 0
// ==========================================

use crate::domain::manifest::{NormalizedValue, RawCell};

/// 全局剔除的货币 / 分组符号（含不换行空格）
const STRIPPED_SYMBOLS: [char; 6] = ['$', '€', '£', ',', '%', '\u{a0}'];

/// Unicode 减号
const UNICODE_MINUS: char = '\u{2212}';

/// 清洗后视为缺失的占位符
const EMPTY_PLACEHOLDERS: [&str; 3] = ["", "--", "-"];

/// 标准化单个单元格
///
/// # 规则（按顺序）
/// 1. Missing / NaN → Missing
/// 2. 字节串先按 UTF-8 解码，失败则按 Latin-1 解码
/// 3. 数值原样返回
/// 4. 文本 TRIM，空串 → Missing
/// 5. 整体被括号包裹 → 负数
/// 6. 剔除 $ € £ , % 与不换行空格
/// 7. Unicode 减号 → ASCII '-'
/// 8. 再次 TRIM，"" / "--" / "-" → Missing
/// 9. 解析浮点数
/// 10. 解析失败 → ResidualText
pub fn normalize(cell: RawCell) -> NormalizedValue {
    match cell {
        RawCell::Missing => NormalizedValue::Missing,
        RawCell::Number(v) if v.is_nan() => NormalizedValue::Missing,
        RawCell::Number(v) => NormalizedValue::Number(v),
        RawCell::Bytes(bytes) => normalize_text(&decode_bytes(&bytes)),
        RawCell::Text(text) => normalize_text(&text),
    }
}

/// 二次转换：用于聚合计算，Missing 与残留文本一律按 0 处理
pub fn coerce_to_f64(value: &NormalizedValue) -> f64 {
    value
        .as_number()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// normalize + coerce_to_f64
pub fn clean_numeric(cell: RawCell) -> f64 {
    coerce_to_f64(&normalize(cell))
}

/// 字节串解码：UTF-8 优先，失败回退 Latin-1（每个字节映射到同码位字符）
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn normalize_text(text: &str) -> NormalizedValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return NormalizedValue::Missing;
    }

    let (body, negative) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (inner.trim(), true),
        None => (trimmed, false),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !STRIPPED_SYMBOLS.contains(c))
        .map(|c| if c == UNICODE_MINUS { '-' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    if EMPTY_PLACEHOLDERS.contains(&cleaned) {
        return NormalizedValue::Missing;
    }

    match parse_float(cleaned) {
        Ok(v) if negative => NormalizedValue::Number(-v),
        Ok(v) => NormalizedValue::Number(v),
        Err(_) => NormalizedValue::ResidualText(cleaned.to_string()),
    }
}

/// 浮点解析；允许数字之间的单个下划线分组（如 "1_000"）
fn parse_float(text: &str) -> Result<f64, std::num::ParseFloatError> {
    if !text.contains('_') {
        return text.parse::<f64>();
    }

    let chars: Vec<char> = text.chars().collect();
    let grouped_between_digits = chars.iter().enumerate().all(|(idx, &c)| {
        c != '_'
            || (idx > 0
                && chars[idx - 1].is_ascii_digit()
                && chars.get(idx + 1).is_some_and(|n| n.is_ascii_digit()))
    });
    if !grouped_between_digits {
        // 交给标准解析报错
        return text.parse::<f64>();
    }

    text.replace('_', "").parse::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_missing_and_blank() {
        assert_eq!(normalize(RawCell::Missing), NormalizedValue::Missing);
        assert_eq!(normalize(RawCell::Number(f64::NAN)), NormalizedValue::Missing);
        assert_eq!(normalize(text("")), NormalizedValue::Missing);
        assert_eq!(normalize(text("  ")), NormalizedValue::Missing);
        assert_eq!(normalize(text("\t\n")), NormalizedValue::Missing);
    }

    #[test]
    fn test_currency_strings() {
        assert_eq!(normalize(text("$1,234.56")), NormalizedValue::Number(1234.56));
        assert_eq!(normalize(text("(1,234.56)")), NormalizedValue::Number(-1234.56));
        assert_eq!(normalize(text(" € 99 ")), NormalizedValue::Number(99.0));
        assert_eq!(normalize(text("£1,000")), NormalizedValue::Number(1000.0));
        assert_eq!(normalize(text("45%")), NormalizedValue::Number(45.0));
        assert_eq!(normalize(text("1\u{a0}200")), NormalizedValue::Number(1200.0));
        assert_eq!(normalize(text("($5.00)")), NormalizedValue::Number(-5.0));
        assert_eq!(normalize(text("( 7 )")), NormalizedValue::Number(-7.0));
    }

    #[test]
    fn test_underscore_digit_grouping() {
        assert_eq!(normalize(text("1_000")), NormalizedValue::Number(1000.0));
        assert_eq!(normalize(text("$1_250.5")), NormalizedValue::Number(1250.5));
        assert_eq!(normalize(text("(2_000)")), NormalizedValue::Number(-2000.0));
        assert_eq!(
            normalize(text("1__000")),
            NormalizedValue::ResidualText("1__000".to_string())
        );
        assert_eq!(
            normalize(text("_100")),
            NormalizedValue::ResidualText("_100".to_string())
        );
        assert_eq!(
            normalize(text("100_")),
            NormalizedValue::ResidualText("100_".to_string())
        );
    }

    #[test]
    fn test_unicode_minus() {
        assert_eq!(normalize(text("\u{2212}12.5")), NormalizedValue::Number(-12.5));
    }

    #[test]
    fn test_dash_placeholders() {
        assert_eq!(normalize(text("-")), NormalizedValue::Missing);
        assert_eq!(normalize(text("--")), NormalizedValue::Missing);
        assert_eq!(normalize(text("$ -")), NormalizedValue::Missing);
        assert_eq!(normalize(text("()")), NormalizedValue::Missing);
        assert_eq!(normalize(text("$")), NormalizedValue::Missing);
    }

    #[test]
    fn test_residual_text() {
        // 欧式千分位：逗号被剔除后按小数解析，不报错
        assert_eq!(normalize(text("1.234,56")), NormalizedValue::Number(1.23456));
        assert_eq!(
            normalize(text("12 units")),
            NormalizedValue::ResidualText("12 units".to_string())
        );
        assert_eq!(
            normalize(text("N/A each")),
            NormalizedValue::ResidualText("N/A each".to_string())
        );
        assert_eq!(
            normalize(text("(abc)")),
            NormalizedValue::ResidualText("abc".to_string())
        );
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(normalize(RawCell::Number(3.5)), NormalizedValue::Number(3.5));
        assert_eq!(normalize(RawCell::Number(-2.0)), NormalizedValue::Number(-2.0));
    }

    #[test]
    fn test_bytes_utf8_and_latin1() {
        let utf8 = "€12".as_bytes().to_vec();
        assert_eq!(normalize(RawCell::Bytes(utf8)), NormalizedValue::Number(12.0));

        // Latin-1 的 £ (0xA3)，非法 UTF-8
        let latin1 = vec![0xA3, b'3', b'0'];
        assert_eq!(normalize(RawCell::Bytes(latin1)), NormalizedValue::Number(30.0));

        assert_eq!(decode_bytes(&[0xE9]), "é");
    }

    #[test]
    fn test_coerce_to_f64() {
        assert_eq!(coerce_to_f64(&NormalizedValue::Number(4.25)), 4.25);
        assert_eq!(coerce_to_f64(&NormalizedValue::Missing), 0.0);
        assert_eq!(
            coerce_to_f64(&NormalizedValue::ResidualText("abc".to_string())),
            0.0
        );
        assert_eq!(coerce_to_f64(&NormalizedValue::Number(f64::NAN)), 0.0);
        assert_eq!(clean_numeric(text("nan")), 0.0);
        assert_eq!(clean_numeric(text("$2.50")), 2.5);
    }

    #[test]
    fn test_idempotent_on_numbers() {
        let inputs = [
            "$1,234.56",
            "(1,234.56)",
            "0.1",
            "-0",
            "1e6",
            "£ 3",
            "\u{2212}7.25",
            "123456789.123",
        ];
        for input in inputs {
            let first = normalize(text(input));
            let value = first.as_number().expect("应为数值");
            let second = normalize(text(&value.to_string()));
            assert_eq!(second.as_number(), Some(value), "输入: {}", input);
        }
    }

    #[test]
    fn test_never_panics_on_garbage() {
        let garbage = [
            "(", ")", "((", "))", "(()", "$$$", "%,%", "--5", "1-2", "¤", "𝟙𝟚", "(\u{a0})",
            "\u{2212}", "inf", "-nan", "_", "__1_", "1_e5",
        ];
        for input in garbage {
            let _ = normalize(text(input));
        }
        let _ = normalize(RawCell::Bytes(vec![0xFF, 0xFE, 0x00, 0x28]));
    }
}
