use std::sync::OnceLock;

use regex::Regex;

fn experience_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(?:-\s*\d+\s*)?\+?\s*years?").expect("valid experience regex")
    })
}

/// Minimum years from a free-text range: "3-5 years" → 3, "2 years" → 2.
/// Anything without a recognisable figure is 0.
pub fn parse_experience(text: &str) -> u32 {
    experience_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
