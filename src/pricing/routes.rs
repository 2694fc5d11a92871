//! Pricing API route handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::models::PriceInput;
use super::requests::AuthorizeChargeRequest;
use super::responses::{AuthorizationResponse, BreakdownResponse, QuoteResponse};
use super::services;

/// Routes mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/breakdown", post(breakdown))
        .route("/quotes", post(create_quote))
        .route("/quotes/:id", get(show_quote))
        .route("/authorize", post(authorize))
}

/// Live price preview
pub async fn breakdown(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PriceInput>, JsonRejection>,
) -> Result<Json<BreakdownResponse>> {
    let Json(input) = payload?;
    let breakdown = services::preview(&state.calculator, &input);
    Ok(Json(breakdown.into()))
}

/// Snapshot a breakdown for a saved quote
pub async fn create_quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PriceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<QuoteResponse>)> {
    let Json(input) = payload?;
    let snapshot = services::save_quote(&state.calculator, &state.quotes, input).await?;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

/// Fetch a saved quote
pub async fn show_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>> {
    let snapshot = services::get_quote(&state.quotes, id).await?;
    Ok(Json(snapshot.into()))
}

/// Server-side re-computation right before charging
pub async fn authorize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AuthorizeChargeRequest>, JsonRejection>,
) -> Result<Json<AuthorizationResponse>> {
    let Json(req) = payload?;
    let auth = services::authorize_charge(&state.calculator, &req.selection, req.final_price)?;
    Ok(Json(auth.into()))
}
