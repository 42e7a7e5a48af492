// Parsing and formatting helpers shared by the resolver and the renderer.
use num_format::{Locale, ToFormattedString};

/// Parse a cell into `f64`, forgiving the usual export noise.
///
/// - Trims whitespace.
/// - Strips thousands separators like `","`.
/// - Accepts scientific notation (`1e-05`) as written by pandas.
/// - Returns `None` for text, `inf`/`NaN` and anything else non-finite.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus thousands separators (e.g. `1,234.5`).
    if !n.is_finite() {
        return n.to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let Ok(int_val) = int_part.parse::<i64>() else {
        // Beyond i64: no separators, but never a wrong magnitude.
        return format!("{:.*}", decimals, n);
    };
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // `-0.0` after rounding should not print a sign.
    if n.is_sign_negative() && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("-0.37")), Some(-0.37));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("경고")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parses_scientific_notation_but_not_non_finite() {
        assert_eq!(parse_f64_safe(Some("1e-05")), Some(1e-05));
        assert_eq!(parse_f64_safe(Some("-2.5E+01")), Some(-25.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
        assert_eq!(parse_f64_safe(Some("-Infinity")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
    }

    #[test]
    fn huge_numbers_keep_their_magnitude() {
        assert_eq!(format_number(1e20, 1), "100000000000000000000.0");
        assert_eq!(format_number(-1e20, 0), "-100000000000000000000");
    }

    #[test]
    fn formats_fixed_decimals() {
        assert_eq!(format_number(71.26, 1), "71.3");
        assert_eq!(format_number(-0.456, 2), "-0.46");
        assert_eq!(format_number(1234.0, 1), "1,234.0");
        assert_eq!(format_number(-0.001, 1), "0.0");
        assert_eq!(format_number(130.0, 0), "130");
        assert_eq!(format_int(9855), "9,855");
    }
}
