use crate::config::{CacheConfig, CatalogConfig};
use crate::models::book::{Book, WorkDetail};
use crate::services::cache::ResponseCache;
use crate::services::normalize::{normalize_search_doc, normalize_subject_work, normalize_work};
use crate::utils::text::{strip_work_prefix, subject_slug};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

const SEARCH_FIELDS: &str = "key,title,author_name,author_key,first_publish_year,subject,cover_i,isbn";

/// The only failure the catalog layer reports: the upstream could not be reached,
/// timed out, answered with a non-success status, or sent an unreadable body.
#[derive(Error, Debug)]
pub enum RemoteFetchError {
    #[error("Open Library {operation} failed: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Open Library {operation} failed: upstream returned HTTP {status}")]
    Status { operation: &'static str, status: u16 },
}

#[async_trait]
pub trait CatalogClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Book>, RemoteFetchError>;
    async fn get_work(&self, work_id: &str) -> Result<WorkDetail, RemoteFetchError>;
    async fn get_subject_works(
        &self,
        subject: &str,
        limit: u32,
    ) -> Result<Vec<Book>, RemoteFetchError>;
}

#[derive(Debug, Clone)]
enum CachedResponse {
    Books(Vec<Book>),
    Work(WorkDetail),
}

fn search_key(query: &str, limit: u32) -> String {
    format!("search:{}:{}", query, limit)
}

fn work_key(work_id: &str) -> String {
    format!("work:{}", work_id)
}

fn subject_key(slug: &str, limit: u32) -> String {
    format!("subject:{}:{}", slug, limit)
}

pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    covers_url: String,
    cache: ResponseCache<CachedResponse>,
}

impl OpenLibraryClient {
    pub fn new(catalog: &CatalogConfig, cache: &CacheConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(catalog.timeout).build()?;

        Ok(Self {
            client,
            base_url: catalog.base_url.trim_end_matches('/').to_string(),
            covers_url: catalog.covers_url.clone(),
            cache: ResponseCache::new(cache.ttl, cache.max_entries),
        })
    }

    async fn fetch_json(
        &self,
        operation: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value, RemoteFetchError> {
        info!("Fetching {} from {}", operation, url);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| {
                warn!("Open Library {} request to {} failed: {}", operation, url, source);
                RemoteFetchError::Request { operation, source }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("Open Library {} returned {} for {}", operation, status, url);
            return Err(RemoteFetchError::Status { operation, status });
        }

        response.json::<Value>().await.map_err(|source| {
            warn!("Open Library {} body unreadable: {}", operation, source);
            RemoteFetchError::Request { operation, source }
        })
    }

    fn cached_books(&self, key: &str) -> Option<Vec<Book>> {
        match self.cache.get(key)? {
            CachedResponse::Books(books) => Some(books),
            CachedResponse::Work(_) => None,
        }
    }
}

#[async_trait]
impl CatalogClient for OpenLibraryClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Book>, RemoteFetchError> {
        let key = search_key(query, limit);
        if let Some(books) = self.cached_books(&key) {
            debug!("Cache hit for {}", key);
            return Ok(books);
        }

        let url = format!("{}/search.json", self.base_url);
        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];
        let data = self.fetch_json("search", &url, &params).await?;

        let books: Vec<Book> = data
            .get("docs")
            .and_then(Value::as_array)
            .map(|docs| {
                docs.iter()
                    .map(|doc| normalize_search_doc(doc, &self.covers_url))
                    .collect()
            })
            .unwrap_or_default();

        self.cache.set(key, CachedResponse::Books(books.clone()));
        Ok(books)
    }

    async fn get_work(&self, work_id: &str) -> Result<WorkDetail, RemoteFetchError> {
        let work_id = strip_work_prefix(work_id);
        let key = work_key(&work_id);
        if let Some(CachedResponse::Work(detail)) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(detail);
        }

        let url = format!(
            "{}/works/{}.json",
            self.base_url,
            urlencoding::encode(&work_id)
        );
        let data = self.fetch_json("work fetch", &url, &[]).await?;

        let detail = normalize_work(&work_id, &data, &self.covers_url);
        self.cache.set(key, CachedResponse::Work(detail.clone()));
        Ok(detail)
    }

    async fn get_subject_works(
        &self,
        subject: &str,
        limit: u32,
    ) -> Result<Vec<Book>, RemoteFetchError> {
        let slug = subject_slug(subject);
        let key = subject_key(&slug, limit);
        if let Some(books) = self.cached_books(&key) {
            debug!("Cache hit for {}", key);
            return Ok(books);
        }

        let url = format!(
            "{}/subjects/{}.json",
            self.base_url,
            urlencoding::encode(&slug)
        );
        let data = self
            .fetch_json("subject fetch", &url, &[("limit", limit.to_string())])
            .await?;

        let books: Vec<Book> = data
            .get("works")
            .and_then(Value::as_array)
            .map(|works| {
                works
                    .iter()
                    .map(|work| normalize_subject_work(work, &slug, &self.covers_url))
                    .collect()
            })
            .unwrap_or_default();

        self.cache.set(key, CachedResponse::Books(books.clone()));
        Ok(books)
    }
}
