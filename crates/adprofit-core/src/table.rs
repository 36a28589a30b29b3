//! Helpers shared by the CSV feed readers

use csv::StringRecord;

/// Rows kept in a schema error preview
pub(crate) const PREVIEW_ROWS: usize = 5;

/// Find a column by name, ignoring case and surrounding whitespace
pub(crate) fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
}

/// True when every cell of the record is blank
pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

pub(crate) fn to_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(|cell| cell.to_string()).collect()
}

/// 1-based line of a record in its source, or 0 if unknown
pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Parse a numeric cell, handling currency symbols and thousands separators
///
/// Accepts an optional sign and `$`, digits grouped by commas in threes, and
/// an optional fraction. `(12.50)` reads as -12.50. Anything else, including
/// unbalanced parentheses, inner spaces, and `NaN`/`inf`, is rejected.
pub(crate) fn parse_amount(s: &str) -> Option<f64> {
    let mut body = s.trim();
    let mut negative = false;

    if let Some(inner) = body.strip_prefix('(') {
        body = inner.strip_suffix(')')?.trim();
        negative = true;
    }
    if body.contains(['(', ')']) {
        return None;
    }

    // "-$5", "$-5" and "$5" are all accepted, each marker at most once
    let mut signed = false;
    let mut currency = false;
    loop {
        if let Some(rest) = body.strip_prefix('-') {
            if signed || negative {
                return None;
            }
            signed = true;
            body = rest;
        } else if let Some(rest) = body.strip_prefix('$') {
            if currency {
                return None;
            }
            currency = true;
            body = rest;
        } else {
            break;
        }
    }

    let digits = strip_thousands(body)?;
    let value = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if negative || signed {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Validate `1,234.5`-style grouping and drop the separators
///
/// Returns `None` unless the text is ASCII digits with at most one `.`.
fn strip_thousands(body: &str) -> Option<String> {
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return None;
        }
    }

    if int_part.contains(',') {
        let mut groups = int_part.split(',');
        let first = groups.next()?;
        if first.is_empty() || first.len() > 3 || !all_digits(first) {
            return None;
        }
        if !groups.all(|g| g.len() == 3 && all_digits(g)) {
            return None;
        }
    } else if !all_digits(int_part) {
        return None;
    }

    let digit_count = int_part.len() + frac_part.map_or(0, str::len);
    if digit_count == 0 {
        return None;
    }

    Some(body.replace(',', ""))
}
