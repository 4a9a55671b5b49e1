//! OpenAPI documentation configuration.

use crate::handlers;
use crate::models::{
    BalanceResponse, ChatMessageRequest, ChatResponse, CreateSessionRequest, HealthResponse,
    PoolResponse, PreparePositionRequest, PreparedPositionResponse, RangeCandidateResponse,
    RangesResponse, RecommendRequest, RecommendResponse, SessionResponse, StreamResponse,
    ValidateBalanceRequest,
};
use utoipa::OpenApi;

/// OpenAPI documentation structure.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DLMM Liquidity Advisor API",
        description = "Pool selection by portfolio style, bin-range recommendations \
                       and wallet balance validation for Meteora DLMM pools."
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Sessions", description = "Chat sessions, pool recommendations and streamed answers"),
        (name = "Pools", description = "Bin-range candidates"),
        (name = "Balance", description = "Wallet balance validation"),
        (name = "Positions", description = "Position pre-flight")
    ),
    paths(
        handlers::health_check,
        handlers::create_session,
        handlers::delete_session,
        handlers::recommend_pool,
        handlers::chat,
        handlers::stream_snapshot,
        handlers::pool_ranges,
        handlers::validate_balance,
        handlers::prepare_position,
    ),
    components(
        schemas(
            HealthResponse,
            CreateSessionRequest,
            SessionResponse,
            RecommendRequest,
            RecommendResponse,
            PoolResponse,
            RangeCandidateResponse,
            RangesResponse,
            ValidateBalanceRequest,
            BalanceResponse,
            ChatMessageRequest,
            ChatResponse,
            StreamResponse,
            PreparePositionRequest,
            PreparedPositionResponse,
        )
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI document as JSON.
#[must_use]
pub fn openapi_json() -> String {
    ApiDoc::openapi().to_json().unwrap_or_default()
}
