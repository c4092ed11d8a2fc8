// Finance Tracker - REST API
// Every route below /api/sessions/:id works on that session's ledger only.

use axum::{
    extract::{
        rejection::JsonRejection,
        FromRequest, FromRequestParts, Path, Request, State,
    },
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::aggregate::{self, Totals, TrendPoint};
use crate::error::TrackerError;
use crate::export::{export_csv, EXPORT_FILE_NAME};
use crate::form::{TransactionForm, DATE_FORMAT};
use crate::ledger::Ledger;
use crate::session::{SessionId, SessionStore};
use crate::transaction::{Category, Transaction, TransactionKind};

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    sessions: Arc<Mutex<SessionStore>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State over a store with custom session limits
    pub fn with_store(store: SessionStore) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(store)),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, SessionStore> {
        // A panic mid-request cannot leave a ledger half-written, so a
        // poisoned lock is still usable.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

enum ApiError {
    SessionNotFound(SessionId),
    BadRequest(TrackerError),
    /// Path or body that could not be extracted at all
    Rejected(String),
    Internal(TrackerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("session {} not found", id))
            }
            ApiError::BadRequest(e) => {
                warn!("rejected request: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Rejected(message) => {
                warn!("malformed request: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Internal(e) => {
                warn!("request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(ApiResponse::err(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Extractors
// ============================================================================

/// `Path` whose rejection uses the JSON envelope
struct ApiPath<T>(T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(ApiError::Rejected(rejection.body_text())),
        }
    }
}

/// `Json` whose rejection uses the JSON envelope
struct ApiJson<T>(T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::Rejected(rejection.body_text())),
        }
    }
}

/// Run `f` against one session's ledger, or 404
fn with_ledger<T>(
    state: &AppState,
    id: SessionId,
    f: impl FnOnce(&mut Ledger) -> T,
) -> Result<T, ApiError> {
    let mut sessions = state.sessions();
    let ledger = sessions.ledger_mut(&id).ok_or(ApiError::SessionNotFound(id))?;
    Ok(f(ledger))
}

fn parse_kind(raw: &str) -> Result<TransactionKind, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Serialize)]
struct SessionResponse {
    id: SessionId,
}

/// Transaction response (flattened for API)
#[derive(Serialize)]
struct TransactionResponse {
    date: String,
    kind: TransactionKind,
    category: Category,
    amount: String,
    signed_amount: String,
    description: Option<String>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date().format(DATE_FORMAT).to_string(),
            kind: tx.kind(),
            category: tx.category(),
            amount: tx.amount().to_string(),
            signed_amount: tx.signed_amount().to_string(),
            description: tx.description().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
struct CategoryAmount {
    category: Category,
    amount: String,
}

#[derive(Serialize)]
struct KindAmount {
    kind: TransactionKind,
    amount: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/categories/:kind - Categories a form may offer for a kind
async fn list_categories(ApiPath(kind): ApiPath<String>) -> ApiResult<&'static [Category]> {
    let kind = parse_kind(&kind)?;
    Ok(Json(ApiResponse::ok(kind.categories())))
}

/// POST /api/sessions - Start a session with an empty ledger
async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let id = state.sessions().create();
    (StatusCode::CREATED, Json(ApiResponse::ok(SessionResponse { id })))
}

/// DELETE /api/sessions/:id - End a session
async fn delete_session(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.sessions().remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// GET /api/sessions/:id/transactions - Ledger in insertion order
async fn get_transactions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> ApiResult<Vec<TransactionResponse>> {
    let rows = with_ledger(&state, id, |ledger| {
        ledger.all().iter().map(TransactionResponse::from).collect()
    })?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/sessions/:id/history - Newest first
async fn get_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> ApiResult<Vec<TransactionResponse>> {
    let rows = with_ledger(&state, id, |ledger| {
        ledger.history().into_iter().map(TransactionResponse::from).collect()
    })?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/sessions/:id/transactions - Validate a form and append it
async fn add_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    let tx = form.into_transaction().map_err(ApiError::BadRequest)?;
    let response = TransactionResponse::from(&tx);
    with_ledger(&state, id, |ledger| ledger.add(tx))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(response))))
}

/// DELETE /api/sessions/:id/transactions - Clear all data
async fn clear_transactions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> Result<StatusCode, ApiError> {
    with_ledger(&state, id, Ledger::clear)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/:id/totals - Income, expense and balance
async fn get_totals(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> ApiResult<Totals> {
    let totals = with_ledger(&state, id, |ledger| aggregate::totals_by_kind(ledger.all()))?;
    Ok(Json(ApiResponse::ok(totals)))
}

/// GET /api/sessions/:id/breakdown/:kind - Per-category sums
async fn get_breakdown(
    State(state): State<AppState>,
    ApiPath((id, kind)): ApiPath<(SessionId, String)>,
) -> ApiResult<Vec<CategoryAmount>> {
    let kind = parse_kind(&kind)?;
    let rows = with_ledger(&state, id, |ledger| {
        aggregate::breakdown_by_category(ledger.all(), kind)
            .into_iter()
            .map(|(category, amount)| CategoryAmount {
                category,
                amount: amount.to_string(),
            })
            .collect()
    })?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/sessions/:id/summary - Income vs expense bars
async fn get_summary(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> ApiResult<Vec<KindAmount>> {
    let rows = with_ledger(&state, id, |ledger| {
        aggregate::kind_summary(ledger.all())
            .into_iter()
            .map(|(kind, amount)| KindAmount {
                kind,
                amount: amount.to_string(),
            })
            .collect()
    })?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/sessions/:id/trend - Daily sums per kind
async fn get_trend(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> ApiResult<Vec<TrendPoint>> {
    let trend = with_ledger(&state, id, |ledger| aggregate::daily_trend(ledger.all()))?;
    Ok(Json(ApiResponse::ok(trend)))
}

/// GET /api/sessions/:id/export - CSV download
async fn export_transactions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SessionId>,
) -> Result<Response, ApiError> {
    let csv = with_ledger(&state, id, |ledger| export_csv(ledger.all()))?
        .map_err(ApiError::Internal)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/", post(create_session))
        .route("/:id", axum::routing::delete(delete_session))
        .route(
            "/:id/transactions",
            get(get_transactions)
                .post(add_transaction)
                .delete(clear_transactions),
        )
        .route("/:id/history", get(get_history))
        .route("/:id/totals", get(get_totals))
        .route("/:id/breakdown/:kind", get(get_breakdown))
        .route("/:id/summary", get(get_summary))
        .route("/:id/trend", get(get_trend))
        .route("/:id/export", get(export_transactions));

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/categories/:kind", get(list_categories))
        .nest("/sessions", session_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
