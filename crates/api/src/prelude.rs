pub use crate::error::{ApiError, ApiResult};
pub use crate::openapi::{ApiDoc, openapi_json};
pub use crate::routes::create_router;
pub use crate::server::{ApiServer, ServerConfig, build_state};
pub use crate::state::{AppState, DEFAULT_SESSION_TTL, SessionEntry, SharedSession};
