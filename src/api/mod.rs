//! HTTP API for the payroll engine.
//!
//! Exposes the run lifecycle, slip reads, and the sensitive-change
//! workflow over an axum router. The caller's identity arrives in the
//! `x-org-id`, `x-user-id`, and `x-role` headers, resolved by the
//! surrounding application's authentication layer.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CreateRunRequest, ProposeChangeRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
