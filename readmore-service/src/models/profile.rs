use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// How many ids from each of the liked/disliked/saved lists are honoured.
pub const SEEN_LIST_LIMIT: usize = 500;

/// Publication era buckets used as a soft scoring signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    Classic,
    Modern,
}

impl Era {
    pub const CLASSIC_CUTOFF_YEAR: i64 = 1980;

    pub fn from_year(year: i64) -> Self {
        if year < Self::CLASSIC_CUTOFF_YEAR {
            Era::Classic
        } else {
            Era::Modern
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Era::Classic => "classic",
            Era::Modern => "modern",
        }
    }
}

/// User taste weights. Any real number is accepted; only positive weights count.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TasteProfile {
    #[serde(default, deserialize_with = "lenient_weights")]
    pub subjects: HashMap<String, f64>,
    #[serde(default, deserialize_with = "lenient_weights")]
    pub authors: HashMap<String, f64>,
    #[serde(default, deserialize_with = "lenient_weights")]
    pub era: HashMap<String, f64>,
}

impl TasteProfile {
    /// Verbatim key first; a missing or non-positive weight falls through to the
    /// underscored form (`science fiction` -> `science_fiction`).
    pub fn subject_weight(&self, subject: &str) -> Option<f64> {
        self.subjects
            .get(subject)
            .copied()
            .filter(|w| *w > 0.0)
            .or_else(|| self.subjects.get(&subject.replace(' ', "_")).copied())
    }

    pub fn author_weight(&self, key: &str) -> Option<f64> {
        self.authors.get(key).copied()
    }

    pub fn era_weight(&self, era: Era) -> Option<f64> {
        self.era.get(era.as_str()).copied()
    }
}

/// Accepts a missing or `null` map and silently drops non-numeric weights.
fn lenient_weights<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.as_f64().map(|weight| (key, weight)))
        .collect())
}

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Work ids the user already interacted with. Never recommended.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn from_lists(liked: &[String], disliked: &[String], saved: &[String]) -> Self {
        let ids = [liked, disliked, saved]
            .into_iter()
            .flat_map(|list| list.iter().take(SEEN_LIST_LIMIT).cloned())
            .collect();
        Self { ids }
    }

    pub fn contains(&self, work_id: &str) -> bool {
        self.ids.contains(work_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
