use crate::models::profile::{null_as_default, TasteProfile};
use serde::Deserialize;

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<u32>,
}

impl SearchParams {
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub liked_works: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disliked_works: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub saved_works: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: TasteProfile,
}
