use crate::models::requests::RecommendRequest;
use crate::models::responses::RecommendResponse;
use crate::routes::error::ApiError;
use crate::routes::Catalog;
use crate::services::recommend::recommend;
use axum::{extract::State, response::Json};

pub async fn recommend_books(
    State(catalog): State<Catalog>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let response = recommend(catalog.as_ref(), &request).await?;
    Ok(Json(response))
}
