use crate::models::book::Book;
use crate::models::profile::{SeenSet, TasteProfile};
use crate::services::catalog::{CatalogClient, RemoteFetchError};
use futures::future::try_join_all;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

pub const MAX_PROFILE_SUBJECTS: usize = 5;
pub const SUBJECT_FETCH_LIMIT: u32 = 50;

/// A book surfaced during aggregation, tagged with the profile subject whose
/// listing produced it first.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub book: Book,
    pub origin_subject: Option<String>,
}

/// Profile subjects with a strictly positive weight, heaviest first.
/// Equal weights are ordered by subject name.
pub fn top_subjects(profile: &TasteProfile, n: usize) -> Vec<String> {
    let mut weighted: Vec<(&String, f64)> = profile
        .subjects
        .iter()
        .filter(|(_, w)| **w > 0.0)
        .map(|(s, w)| (s, *w))
        .collect();

    weighted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    weighted
        .into_iter()
        .take(n)
        .map(|(s, _)| s.clone())
        .collect()
}

/// Fetches every subject listing concurrently and merges them in `subjects` order,
/// keeping the first occurrence of each work. Seen and id-less works are dropped.
///
/// A single failed listing fails the whole aggregation.
pub async fn aggregate_candidates<C>(
    catalog: &C,
    subjects: &[String],
    seen: &SeenSet,
) -> Result<Vec<Candidate>, RemoteFetchError>
where
    C: CatalogClient + Send + Sync + ?Sized,
{
    let listings = try_join_all(
        subjects
            .iter()
            .map(|subject| catalog.get_subject_works(subject, SUBJECT_FETCH_LIMIT)),
    )
    .await?;

    let mut pool = Vec::new();
    let mut ids = HashSet::new();

    for (subject, works) in subjects.iter().zip(listings) {
        let fetched = works.len();
        for book in works {
            let work_id = book.work_id.trim();
            if work_id.is_empty() || seen.contains(work_id) {
                continue;
            }
            if !ids.insert(work_id.to_string()) {
                continue;
            }
            pool.push(Candidate {
                book,
                origin_subject: Some(subject.clone()),
            });
        }
        debug!("Subject '{}' returned {} works", subject, fetched);
    }

    info!(
        "Aggregated {} candidates from {} subjects",
        pool.len(),
        subjects.len()
    );
    Ok(pool)
}
