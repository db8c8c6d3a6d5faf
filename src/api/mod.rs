use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    error::TravelSynthError,
    models::TravelPreferences,
    session::SessionView,
};

#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    pub urls: Vec<String>,
    #[serde(default)]
    pub preferences: TravelPreferences,
}

#[derive(Debug, Deserialize)]
pub struct UrlsRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub session: SessionView,
}

/// Error response carrying the user-facing message and the session as it is now
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl ApiError {
    async fn from_error(err: TravelSynthError, state: &AppState) -> Self {
        let status = match &err {
            TravelSynthError::Validation { .. } => StatusCode::BAD_REQUEST,
            TravelSynthError::Busy => StatusCode::CONFLICT,
            TravelSynthError::Generation { .. } => StatusCode::BAD_GATEWAY,
            TravelSynthError::Config { .. } | TravelSynthError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            body: ApiErrorBody {
                error: err.user_message(),
                session: state.view().await,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/session", get(get_session))
        .route("/urls", put(put_urls))
        .route("/guide", post(create_guide))
        .with_state(state)
}

async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.view().await)
}

async fn put_urls(
    State(state): State<AppState>,
    Json(payload): Json<UrlsRequest>,
) -> Result<Json<SessionView>, ApiError> {
    match state.set_urls(payload.urls).await {
        Ok(view) => Ok(Json(view)),
        Err(err) => Err(ApiError::from_error(err, &state).await),
    }
}

async fn create_guide(
    State(state): State<AppState>,
    Json(payload): Json<GuideRequest>,
) -> Result<Json<SessionView>, ApiError> {
    match state.generate(payload.urls, payload.preferences).await {
        Ok(view) => Ok(Json(view)),
        Err(err) => Err(ApiError::from_error(err, &state).await),
    }
}
