use crate::models::profile::SeenSet;
use crate::models::requests::RecommendRequest;
use crate::models::responses::RecommendResponse;
use crate::services::aggregate::{aggregate_candidates, top_subjects, MAX_PROFILE_SUBJECTS};
use crate::services::catalog::{CatalogClient, RemoteFetchError};
use crate::services::ranking::{Diversifier, ScoredCandidate};
use crate::services::scoring::score_candidate;
use tracing::info;

pub const NO_SUBJECTS_MESSAGE: &str = "Like or save some books to get recommendations.";

/// Content-based recommendations for one request: aggregate candidates from the
/// profile's strongest subjects, score each against the profile, then rank.
pub async fn recommend<C>(
    catalog: &C,
    request: &RecommendRequest,
) -> Result<RecommendResponse, RemoteFetchError>
where
    C: CatalogClient + Send + Sync + ?Sized,
{
    let seen = SeenSet::from_lists(
        &request.liked_works,
        &request.disliked_works,
        &request.saved_works,
    );
    let profile = &request.profile;

    let subjects = top_subjects(profile, MAX_PROFILE_SUBJECTS);
    if subjects.is_empty() {
        info!("No positively weighted subjects, skipping recommendation");
        return Ok(RecommendResponse {
            recommendations: Vec::new(),
            message: Some(NO_SUBJECTS_MESSAGE.to_string()),
        });
    }

    info!(
        "Recommending from subjects {:?} ({} seen works)",
        subjects,
        seen.len()
    );

    let candidates = aggregate_candidates(catalog, &subjects, &seen).await?;

    let scored = candidates
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: score_candidate(&candidate.book, profile, &seen),
            candidate,
        })
        .collect();

    let recommendations = Diversifier::default().rank(scored);
    info!("Returning {} recommendations", recommendations.len());

    Ok(RecommendResponse {
        recommendations,
        message: None,
    })
}
