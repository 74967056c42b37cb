use crate::models::book::WorkDetail;
use crate::models::requests::SearchParams;
use crate::models::responses::SearchResponse;
use crate::routes::error::ApiError;
use crate::routes::Catalog;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use tracing::info;

pub async fn search_books(
    Query(params): Query<SearchParams>,
    State(catalog): State<Catalog>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let limit = params.effective_limit();
    info!("Search query: {:?} (limit {})", query, limit);

    let results = catalog.search(query, limit).await?;
    Ok(Json(SearchResponse { results }))
}

pub async fn get_work(
    Path(work_id): Path<String>,
    State(catalog): State<Catalog>,
) -> Result<Json<WorkDetail>, ApiError> {
    info!("Work lookup: {}", work_id);

    let detail = catalog.get_work(&work_id).await?;
    Ok(Json(detail))
}
