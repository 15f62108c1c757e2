//! Maintenance endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::maintenance::{reconcile, ReconcileReport};
use crate::AppState;

/// POST /api/admin/maintenance/reconcile - Check in submitted teams and
/// canonicalize room numbers.
pub async fn run_reconcile(State(state): State<AppState>) -> ApiResult<ReconcileReport> {
    let report = reconcile(&state.repo).await?;
    success(report)
}
