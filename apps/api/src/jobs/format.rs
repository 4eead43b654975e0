//! Display formatting for job fields.

use chrono::{DateTime, Utc};

use crate::jobs::model::{Salary, NOT_DISCLOSED};
use crate::jobs::search::parse_posted_at;

/// Salary for display: "150000-180000" → "$150,000 - $180,000",
/// 95000 → "$95,000". Other text passes through unchanged.
pub fn format_salary(salary: &Salary) -> String {
    match salary {
        Salary::Amount(amount) => format!("${}", group_thousands(*amount)),
        Salary::Text(text) => {
            if text.eq_ignore_ascii_case(NOT_DISCLOSED) {
                return NOT_DISCLOSED.to_string();
            }
            if let Some((min, max)) = parse_range(text) {
                return format!("${} - ${}", group_thousands(min), group_thousands(max));
            }
            text.clone()
        }
    }
}

fn parse_range(text: &str) -> Option<(f64, f64)> {
    let mut parts = text.split('-').map(str::trim);
    let min = parts.next()?.parse::<f64>().ok()?;
    let max = parts.next()?.parse::<f64>().ok()?;
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// en-US style grouping with up to three fractional digits.
fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let scaled = (value.abs() * 1000.0).round() as u128;
    let whole = (scaled / 1000).to_string();
    let fraction = scaled % 1000;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction > 0 {
        let digits = format!("{fraction:03}");
        grouped.push('.');
        grouped.push_str(digits.trim_end_matches('0'));
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Relative posting age ("Today", "3 days ago", "2 months ago").
/// Values that are not dates are returned as-is.
pub fn format_posted_at(raw: &str, now: DateTime<Utc>) -> String {
    let Some(posted) = parse_posted_at(raw) else {
        return raw.to_string();
    };

    let days = (now - posted).num_days().abs();
    let unit = |n: i64, singular: &str| {
        if n == 1 {
            format!("{n} {singular} ago")
        } else {
            format!("{n} {singular}s ago")
        }
    };

    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => unit(days / 7, "week"),
        30..=364 => unit(days / 30, "month"),
        _ => unit(days / 365, "year"),
    }
}

/// Cuts `text` to at most `max_chars` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Company name as used in profile URLs: lower-case, whitespace runs → "-".
pub fn company_profile_slug(company: &str) -> String {
    company
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
