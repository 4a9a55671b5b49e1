//! Request handlers.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    BalanceResponse, ChatMessageRequest, ChatResponse, CreateSessionRequest, HealthResponse,
    PreparePositionRequest, PreparedPositionResponse, RangesQuery, RangesResponse,
    RecommendRequest, RecommendResponse, SessionResponse, StreamResponse, ValidateBalanceRequest,
};
use crate::state::{AppState, SharedSession};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use dlmm_lp_domain::{RangeLabel, RiskStyle};
use dlmm_lp_execution::submit::PositionRequest;
use dlmm_lp_optimization::recommender::RangeMode;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

fn parse_style(style: Option<&str>) -> ApiResult<Option<RiskStyle>> {
    match style.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<RiskStyle>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

fn parse_mode(mode: Option<&str>) -> ApiResult<RangeMode> {
    match mode.map(|m| m.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("standard") => Ok(RangeMode::Standard),
        Some("existing_bins_only") | Some("existing") => Ok(RangeMode::ExistingBinsOnly),
        Some(other) => Err(ApiError::BadRequest(format!("unknown range mode: {other}"))),
    }
}

async fn find_session(state: &AppState, id: &Uuid) -> ApiResult<SharedSession> {
    state
        .session(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        sessions: state.session_count().await,
    })
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Opens a chat session.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Unknown style")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let style = parse_style(request.style.as_deref())?;
    let session = state.create_session(style).await;
    let session = session.lock().await;
    info!(session = %session.id, style = ?style, "Session created");
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&*session))))
}

/// Closes a session.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.remove_session(&id).await {
        return Err(ApiError::NotFound(format!("session {id}")));
    }
    info!(session = %id, "Session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Recommends the next pool for a session.
#[utoipa::path(
    post,
    path = "/sessions/{id}/recommend",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendation, possibly without a pool", body = RecommendResponse),
        (status = 404, description = "Unknown session"),
        (status = 502, description = "Pool listing unavailable")
    )
)]
pub async fn recommend_pool(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<RecommendRequest>>,
) -> ApiResult<Json<RecommendResponse>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let style = parse_style(request.style.as_deref())?;
    let shared = find_session(&state, &id).await?;
    let mut session = shared.lock().await;

    let recommendation = state
        .advisor
        .recommend_pool(&mut session, request.search.as_deref(), style)
        .await?;
    Ok(Json(recommendation.into()))
}

/// Sends a chat message and waits for the full answer.
///
/// The answer streams into the session buffer while it is generated; poll
/// `/sessions/{id}/stream` for partial text.
#[utoipa::path(
    post,
    path = "/sessions/{id}/chat",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Chat answer", body = ChatResponse),
        (status = 404, description = "Unknown session"),
        (status = 502, description = "Chat backend unavailable")
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChatMessageRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if body.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }
    let shared = find_session(&state, &id).await?;

    // Do not hold the session while streaming.
    let (request, stream) = {
        let session = shared.lock().await;
        (session.chat_request(&body.message), Arc::clone(&session.stream))
    };
    let reply = state.advisor.chat(&request, &stream).await?;

    if reply.current {
        shared.lock().await.push_exchange(&body.message, &reply.answer);
    } else {
        debug!(session = %id, ticket = reply.ticket.0, "Superseded answer not recorded");
    }
    Ok(Json(reply.into()))
}

/// Current contents of the session's streaming buffer.
#[utoipa::path(
    get,
    path = "/sessions/{id}/stream",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Stream snapshot", body = StreamResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn stream_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StreamResponse>> {
    let shared = find_session(&state, &id).await?;
    let stream = Arc::clone(&shared.lock().await.stream);
    Ok(Json(stream.snapshot().into()))
}

// ---------------------------------------------------------------------------
// Pools
// ---------------------------------------------------------------------------

/// Candidate bin ranges around the pool's current active bin.
#[utoipa::path(
    get,
    path = "/pools/{address}/ranges",
    tag = "Pools",
    params(("address" = String, Path, description = "Pool address"), RangesQuery),
    responses(
        (status = 200, description = "Range candidates", body = RangesResponse),
        (status = 400, description = "Invalid mode or width, or width with existing_bins_only"),
        (status = 409, description = "No range fits on existing bin arrays"),
        (status = 503, description = "Active bin unavailable")
    )
)]
pub async fn pool_ranges(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<RangesQuery>,
) -> ApiResult<Json<RangesResponse>> {
    let mode = parse_mode(query.mode.as_deref())?;
    let response: RangesResponse = match (mode, query.width) {
        (RangeMode::ExistingBinsOnly, Some(_)) => {
            return Err(ApiError::BadRequest(
                "width is not supported with existing_bins_only".to_string(),
            ));
        }
        (RangeMode::Standard, Some(width)) => {
            let (set, custom) = state.advisor.ranges_with_custom(&address, width).await?;
            let mut response = RangesResponse::from(set);
            response.custom = Some(custom.into());
            response
        }
        (_, None) => state
            .advisor
            .ranges(&address, mode, query.fallback_bin_id)
            .await?
            .into(),
    };
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

/// Checks a wallet's SOL balance against a requirement.
#[utoipa::path(
    post,
    path = "/balance/validate",
    tag = "Balance",
    request_body = ValidateBalanceRequest,
    responses(
        (status = 200, description = "Balance check result", body = BalanceResponse),
        (status = 400, description = "Neither required_sol nor amount_sol given"),
        (status = 503, description = "Balance unavailable")
    )
)]
pub async fn validate_balance(
    State(state): State<AppState>,
    Json(body): Json<ValidateBalanceRequest>,
) -> ApiResult<Json<BalanceResponse>> {
    let required = match (body.required_sol, body.amount_sol) {
        (Some(required), _) => required,
        (None, Some(amount)) => state
            .balance
            .required_for(amount, body.cost_sol.unwrap_or_default()),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either required_sol or amount_sol is needed".to_string(),
            ));
        }
    };
    let check = state.balance.validate(&body.wallet, required).await?;
    Ok(Json(check.into()))
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Re-validates a chosen range against fresh on-chain state.
///
/// Reads the active bin again, re-checks the destination bin arrays,
/// recomputes the cost and checks the wallet balance. Nothing is signed.
#[utoipa::path(
    post,
    path = "/positions/prepare",
    tag = "Positions",
    request_body = PreparePositionRequest,
    responses(
        (status = 200, description = "Pre-flight passed", body = PreparedPositionResponse),
        (status = 400, description = "Invalid label or bounds"),
        (status = 409, description = "Price moved out of range or bin arrays missing"),
        (status = 422, description = "Insufficient balance"),
        (status = 503, description = "Active bin, bin arrays or balance unavailable")
    )
)]
pub async fn prepare_position(
    State(state): State<AppState>,
    Json(body): Json<PreparePositionRequest>,
) -> ApiResult<Json<PreparedPositionResponse>> {
    let label = match body.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        None => RangeLabel::Custom,
        Some(l) => l
            .parse::<RangeLabel>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };
    if body.min_bin_id > body.max_bin_id {
        return Err(ApiError::BadRequest(
            "min_bin_id must not exceed max_bin_id".to_string(),
        ));
    }
    if body.amount_sol.is_sign_negative() {
        return Err(ApiError::BadRequest("amount_sol must not be negative".to_string()));
    }

    let request = PositionRequest {
        pool_address: body.pool_address,
        wallet: body.wallet,
        label,
        min_bin_id: body.min_bin_id,
        max_bin_id: body.max_bin_id,
        amount_sol: body.amount_sol,
        existing_bins_only: body.existing_bins_only,
    };
    let prepared = state.positions.prepare(&request).await?;
    Ok(Json(prepared.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        assert_eq!(parse_style(None).unwrap(), None);
        assert_eq!(parse_style(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_style(Some("Aggressive")).unwrap(),
            Some(RiskStyle::Aggressive)
        );
        assert!(parse_style(Some("yolo")).is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(None).unwrap(), RangeMode::Standard);
        assert_eq!(
            parse_mode(Some("existing_bins_only")).unwrap(),
            RangeMode::ExistingBinsOnly
        );
        assert!(parse_mode(Some("wide")).is_err());
    }
}
