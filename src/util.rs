/// Formatting helpers shared by collectors and KPIs.
///
/// This module contains:
/// - Label / metric name normalization
/// - Comma-separated rendering of multi-valued fields
/// - Parsing of text-encoded numeric values
///
/// Nothing in here knows about a specific backend.

use std::collections::HashMap;

/// Normalizes a backend-provided name into a metric/label name.
///
/// Examples:
/// - "RRC.Conn.Avg" -> "rrc_conn_avg"
/// - "neighbors"    -> "neighbors"
/// - "DRB.UEThpDl"  -> "drb_uethpdl"
///
/// Everything outside `[a-z0-9_]` becomes `_`. A leading digit gets
/// a `_` prefix. Returns `None` for an empty (or all-blank) name, which
/// has no valid label form.
pub fn normalize_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut out: String = raw
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }
        })
        .collect();

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    Some(out)
}

/// Joins already formatted parts with `,`, sorted for stable output.
pub fn sorted_csv<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut parts: Vec<String> = parts.into_iter().collect();
    parts.sort();
    parts.join(",")
}

/// Renders a label map as `k1=v1,k2=v2`.
pub fn labels_csv(labels: &HashMap<String, String>) -> String {
    sorted_csv(labels.iter().map(|(k, v)| format!("{}={}", k, v)))
}

/// Renders the aspect type names of an object.
pub fn aspect_names_csv<V>(aspects: &HashMap<String, V>) -> String {
    sorted_csv(aspects.keys().cloned())
}

/// Cell identifiers are exported in lowercase hex.
pub fn hex_id(id: u64) -> String {
    format!("{:x}", id)
}

/// Parses a text-encoded measurement.
///
/// Accepts decimal integers, `0x` / `0o` / `0b` prefixed integers
/// (optionally signed) and decimal reals. Returns `None` otherwise.
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let radix = match digits.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        // from_str_radix takes its own sign, only one is allowed
        if digits[2..].starts_with(['+', '-']) {
            return None;
        }
        let magnitude = i64::from_str_radix(&digits[2..], radix).ok()? as f64;
        return Some(if negative { -magnitude } else { magnitude });
    }

    if let Ok(v) = text.parse::<i64>() {
        return Some(v as f64);
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
