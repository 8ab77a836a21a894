//! HTTP request handlers for the payroll engine API.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{AuthContext, Role};
use crate::models::ReviewDecision;

use super::request::{CreateRunRequest, ProposeChangeRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(create_run_handler))
        .route("/runs/:id", get(get_run_handler))
        .route("/runs/:id", delete(delete_run_handler))
        .route("/runs/:id/process", post(process_run_handler))
        .route("/runs/:id/finalize", post(finalize_run_handler))
        .route("/runs/:id/slips", get(get_run_slips_handler))
        .route("/slips/:id", get(get_slip_handler))
        .route("/changes", post(propose_change_handler))
        .route("/changes/pending", get(list_pending_handler))
        .route("/changes/:id/review", post(review_change_handler))
        .with_state(state)
}

/// Resolves the caller's identity from the auth headers set by the
/// surrounding application.
fn auth_from_headers(headers: &HeaderMap) -> Result<AuthContext, ApiErrorResponse> {
    let header = |name: &str| -> Result<String, ApiErrorResponse> {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ApiErrorResponse::new(
                    StatusCode::UNAUTHORIZED,
                    ApiError::unauthenticated(format!("missing {name} header")),
                )
            })
    };

    let org_id = header("x-org-id")?;
    let user_id = header("x-user-id")?;
    let role = match header("x-role")?.as_str() {
        "employee" => Role::Employee,
        "hr_manager" => Role::HrManager,
        "org_admin" => Role::OrgAdmin,
        other => {
            return Err(ApiErrorResponse::new(
                StatusCode::UNAUTHORIZED,
                ApiError::unauthenticated(format!("unknown role '{other}'")),
            ));
        }
    };

    Ok(AuthContext {
        org_id,
        user_id,
        role,
    })
}

/// Turns a JSON extractor rejection into the API error envelope.
fn json_rejection(rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error)
}

async fn create_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection).into_response(),
    };

    info!(
        correlation_id = %correlation_id,
        org_id = %ctx.org_id,
        month = request.month,
        year = request.year,
        "Creating payroll run"
    );
    match state
        .orchestrator()
        .create_run(&ctx, request.month, request.year)
    {
        Ok(run) => (StatusCode::CREATED, Json(run)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn process_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(run_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing payroll run");
    match state.orchestrator().process_run(&ctx, run_id) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, run_id = %run_id, error = %err, "Processing failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

async fn finalize_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(run_id): Path<Uuid>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.orchestrator().finalize_run(&ctx, run_id) {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn delete_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(run_id): Path<Uuid>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.orchestrator().delete_run(&ctx, run_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn get_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(run_id): Path<Uuid>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.orchestrator().get_run(&ctx, run_id) {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn get_run_slips_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(run_id): Path<Uuid>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.orchestrator().get_run_slips(&ctx, run_id) {
        Ok(slips) => (StatusCode::OK, Json(slips)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn get_slip_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slip_id): Path<Uuid>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    match state.orchestrator().get_payslip(&ctx, slip_id) {
        Ok(slip) => (StatusCode::OK, Json(slip)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn propose_change_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProposeChangeRequest>, JsonRejection>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection).into_response(),
    };

    match state.workflow().propose(
        &ctx,
        &request.employee_id,
        request.changes,
        &request.reason,
    ) {
        Ok(change) => (StatusCode::CREATED, Json(change)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn review_change_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(request_id): Path<Uuid>,
    payload: Result<Json<ReviewDecision>, JsonRejection>,
) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };
    let decision = match payload {
        Ok(Json(decision)) => decision,
        Err(rejection) => return json_rejection(rejection).into_response(),
    };

    match state.workflow().review(&ctx, request_id, decision) {
        Ok(change) => (StatusCode::OK, Json(change)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

async fn list_pending_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match auth_from_headers(&headers) {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    (StatusCode::OK, Json(state.workflow().list_pending(&ctx))).into_response()
}
