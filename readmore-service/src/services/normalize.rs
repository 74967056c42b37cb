//! Mapping of Open Library's loosely-shaped JSON into [`Book`] records.
//!
//! Normalization never fails: missing or oddly-typed fields fall back to defaults
//! (`"Unknown"` title, absent year, empty lists). Only transport problems are
//! surfaced as errors, and those are handled by the catalog client.

use crate::models::book::{Author, Book, BookSource, WorkDetail, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
use crate::utils::text::{
    last_path_segment, normalize_subject, strip_author_prefix, strip_work_prefix,
};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const MAX_SUBJECTS: usize = 20;
pub const MAX_ISBNS: usize = 15;
pub const MAX_WORK_AUTHORS: usize = 10;
pub const MAX_SUBJECT_LISTING_AUTHORS: usize = 5;
const ISBNS_PER_FIELD: usize = 10;
const ISBN_FIELDS: [&str; 3] = ["isbn_10", "isbn_13", "isbn"];

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\d{4}").expect("year pattern is valid"))
}

/// JSON truthiness: null, false, 0, "" and empty containers count as missing.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn field<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    doc.get(key).filter(|v| truthy(v))
}

fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn title(doc: &Value) -> String {
    let raw = match doc.get("title") {
        Some(Value::Object(obj)) => obj.get("value"),
        other => other,
    };
    raw.and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TITLE)
        .to_string()
}

fn work_id(doc: &Value) -> String {
    doc.get("key")
        .and_then(scalar_string)
        .map(|key| strip_work_prefix(&key))
        .unwrap_or_default()
}

fn subjects(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(normalize_subject)
            .take(MAX_SUBJECTS)
            .collect(),
        Some(Value::String(s)) => normalize_subject(s).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn cover_url(covers_base: &str, cover_id: Option<i64>) -> Option<String> {
    cover_id
        .filter(|id| *id >= 0)
        .map(|id| format!("{}/b/id/{}-M.jpg", covers_base.trim_end_matches('/'), id))
}

fn dedup_capped(items: impl IntoIterator<Item = String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

/// Values of a string-or-list field, first `per_list` entries of a list.
fn string_list(value: Option<&Value>, per_list: usize) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().take(per_list).filter_map(scalar_string).collect(),
        Some(v) if truthy(v) => scalar_string(v).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Normalizes one `docs[]` entry of `/search.json`.
pub fn normalize_search_doc(doc: &Value, covers_base: &str) -> Book {
    let names = string_list(
        field(doc, "author_name").or_else(|| field(doc, "author_key")),
        usize::MAX,
    );
    let keys = string_list(field(doc, "author_key"), usize::MAX);
    let authors = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Author {
            name,
            key: keys.get(i).map(|k| strip_author_prefix(k)).unwrap_or_default(),
        })
        .collect();

    let first_publish_year = ["first_publish_year", "first_publish_year_i"]
        .iter()
        .filter_map(|k| doc.get(*k))
        .find_map(integer);

    Book {
        work_id: work_id(doc),
        title: title(doc),
        authors,
        first_publish_year,
        subjects: subjects(field(doc, "subject").or_else(|| field(doc, "subjects"))),
        cover_url: cover_url(covers_base, doc.get("cover_i").and_then(integer)),
        source: BookSource::Search,
        isbn: dedup_capped(string_list(doc.get("isbn"), MAX_ISBNS), MAX_ISBNS),
    }
}

fn work_year(data: &Value) -> Option<i64> {
    ["first_publish_date", "first_publish_year"]
        .iter()
        .filter_map(|k| data.get(*k))
        .find_map(|v| match v {
            Value::Number(_) => integer(v),
            Value::String(s) => year_pattern().find(s).and_then(|m| m.as_str().parse().ok()),
            _ => None,
        })
}

fn work_description(data: &Value) -> Option<String> {
    match data.get("description")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("value")
            .filter(|v| truthy(v))
            .or_else(|| obj.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn work_cover_id(data: &Value) -> Option<i64> {
    ["covers", "cover"].iter().find_map(|k| match data.get(*k) {
        Some(Value::Array(ids)) => ids.first().and_then(integer),
        Some(v @ Value::Number(_)) => integer(v),
        _ => None,
    })
}

fn work_isbns(data: &Value) -> Vec<String> {
    let identifiers = data.get("identifiers");
    let direct = ISBN_FIELDS.iter().map(|k| data.get(*k));
    let nested = ISBN_FIELDS
        .iter()
        .map(|k| identifiers.and_then(|ids| ids.get(*k)));

    dedup_capped(
        direct
            .chain(nested)
            .flat_map(|v| string_list(v, ISBNS_PER_FIELD)),
        MAX_ISBNS,
    )
}

/// Normalizes a `/works/{id}.json` record.
pub fn normalize_work(work_id: &str, data: &Value, covers_base: &str) -> WorkDetail {
    let authors = data
        .get("authors")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .take(MAX_WORK_AUTHORS)
                .map(|entry| {
                    let key = match entry.get("author") {
                        Some(author @ Value::Object(_)) => author.get("key"),
                        _ => entry.get("key"),
                    };
                    Author {
                        name: UNKNOWN_AUTHOR.to_string(),
                        key: key
                            .and_then(Value::as_str)
                            .map(last_path_segment)
                            .unwrap_or_default(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    WorkDetail {
        book: Book {
            work_id: work_id.to_string(),
            title: title(data),
            authors,
            first_publish_year: work_year(data),
            subjects: subjects(data.get("subjects")),
            cover_url: cover_url(covers_base, work_cover_id(data)),
            source: BookSource::Work,
            isbn: work_isbns(data),
        },
        description: work_description(data),
    }
}

/// Normalizes one `works[]` entry of `/subjects/{slug}.json`.
///
/// Subject listings are thin: the only subject recorded is the one queried, and
/// no ISBNs are available.
pub fn normalize_subject_work(work: &Value, slug: &str, covers_base: &str) -> Book {
    let authors = work
        .get("authors")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .take(MAX_SUBJECT_LISTING_AUTHORS)
                .map(|author| Author {
                    name: author
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or(UNKNOWN_AUTHOR)
                        .to_string(),
                    key: author
                        .get("key")
                        .and_then(Value::as_str)
                        .map(last_path_segment)
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Book {
        work_id: work_id(work),
        title: title(work),
        authors,
        first_publish_year: work.get("first_publish_year").and_then(integer),
        subjects: normalize_subject(&slug.replace('_', " ")).into_iter().collect(),
        cover_url: cover_url(covers_base, work.get("cover_id").and_then(integer)),
        source: BookSource::Subject,
        isbn: Vec::new(),
    }
}
