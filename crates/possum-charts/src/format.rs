//! Lenient number parsing and display.
//!
//! Aggregates arrive from the server as numbers or as strings such as
//! `"1,250.50"`. Parsing takes the longest numeric prefix, the way browser
//! number parsing does, and display groups thousands with commas.

/// Parse the longest decimal floating point prefix of `s`.
///
/// Leading whitespace is skipped. Returns `None` when no digit starts the
/// string.
///
/// # Examples
///
/// ```
/// use possum_charts::format::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix(" 12.5kg"), Some(12.5));
/// assert_eq!(parse_float_prefix("1,250"), Some(1.0));
/// assert_eq!(parse_float_prefix("abc"), None);
/// ```
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Parse the longest base-10 integer prefix of `s`.
///
/// # Examples
///
/// ```
/// use possum_charts::format::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("1250.75"), Some(1250));
/// assert_eq!(parse_int_prefix("-3 units"), Some(-3));
/// assert_eq!(parse_int_prefix("n/a"), None);
/// ```
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);

    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

/// Format `value` with comma thousands separators and at most three
/// fraction digits.
///
/// # Examples
///
/// ```
/// use possum_charts::format::group_thousands;
///
/// assert_eq!(group_thousands(1234.0), "1,234");
/// assert_eq!(group_thousands(1234567.891), "1,234,567.891");
/// assert_eq!(group_thousands(0.5), "0.5");
/// ```
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
