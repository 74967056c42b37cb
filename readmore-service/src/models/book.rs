use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Which catalog query produced a record. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    Search,
    Work,
    Subject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Catalog author identity (e.g. `OL23919A`), empty when the payload had none.
    #[serde(default)]
    pub key: String,
}

/// A normalized catalog work. Built once by `services::normalize` and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub work_id: String,
    pub title: String,
    pub authors: Vec<Author>,
    pub first_publish_year: Option<i64>,
    pub subjects: Vec<String>,
    pub cover_url: Option<String>,
    pub source: BookSource,
    pub isbn: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDetail {
    #[serde(flatten)]
    pub book: Book,
    pub description: Option<String>,
}

/// A book as handed back by the recommendation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBook {
    #[serde(flatten)]
    pub book: Book,
    pub score: f64,
    pub reasons: Vec<String>,
}
