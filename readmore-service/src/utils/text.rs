pub const WORKS_PREFIX: &str = "/works/";
pub const AUTHORS_PREFIX: &str = "/authors/";

/// Trims and lowercases a subject, returning `None` for blank input.
pub fn normalize_subject(raw: &str) -> Option<String> {
    let subject = raw.trim().to_lowercase();
    if subject.is_empty() {
        None
    } else {
        Some(subject)
    }
}

/// Subject slug as used by the catalog's subject listing endpoint.
pub fn subject_slug(subject: &str) -> String {
    subject.trim().to_lowercase().replace(' ', "_")
}

/// `/works/OL45883W` -> `OL45883W`. Ids without the routing prefix pass through trimmed.
pub fn strip_work_prefix(id: &str) -> String {
    let id = id.trim();
    id.strip_prefix(WORKS_PREFIX).unwrap_or(id).trim().to_string()
}

/// `/authors/OL23919A` -> `OL23919A`
pub fn strip_author_prefix(key: &str) -> String {
    key.strip_prefix(AUTHORS_PREFIX).unwrap_or(key).trim().to_string()
}

pub fn last_path_segment(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_string()
}

/// Rounds on the exact binary value, ties to even: `0.25` -> `0.2`, `0.35` -> `0.3`.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
