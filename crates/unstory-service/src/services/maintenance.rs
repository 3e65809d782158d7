//! Maintenance service
//!
//! Repairs denormalized post counters from their fact tables.

use tracing::{info, instrument};

use crate::dto::ReconcileResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Maintenance service
pub struct MaintenanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set `likes_count` and `views` to the row counts behind them
    #[instrument(skip(self))]
    pub async fn reconcile_counters(&self) -> ServiceResult<ReconcileResponse> {
        let repaired_posts = self.ctx.post_repo().reconcile_counters().await?;
        info!(repaired_posts, "Counters reconciled");
        Ok(ReconcileResponse { repaired_posts })
    }
}
