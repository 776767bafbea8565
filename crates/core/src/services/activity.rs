//! Activity tracking.

use warbler_common::{AppError, AppResult};
use warbler_db::repositories::UserRepository;

/// Records when a user last changed something.
///
/// Touches run as their own statement after the triggering mutation and are
/// never rolled into it.
#[derive(Clone)]
pub struct ActivityTracker {
    user_repo: UserRepository,
}

impl ActivityTracker {
    /// Create a new activity tracker.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Set the user's `last_activity` to now.
    pub async fn touch(&self, user_id: i32) -> AppResult<()> {
        match self.user_repo.touch_last_activity(user_id).await? {
            0 => Err(AppError::UserNotFound(user_id.to_string())),
            _ => Ok(()),
        }
    }

    /// [`Self::touch`], logging instead of failing.
    pub async fn touch_logged(&self, user_id: i32) {
        if let Err(e) = self.touch(user_id).await {
            tracing::warn!(error = %e, user_id, "Failed to update last activity");
        }
    }
}

/// Number of `last_activity` updates recorded by a mock connection.
///
/// Every other holder of `conn` must be dropped first.
#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) fn activity_updates(conn: std::sync::Arc<sea_orm::DatabaseConnection>) -> usize {
    let Ok(conn) = std::sync::Arc::try_unwrap(conn) else {
        panic!("connection is still shared");
    };

    conn.into_transaction_log()
        .iter()
        .flat_map(|t| t.statements())
        .filter(|s| s.sql.starts_with(r#"UPDATE "users" SET "last_activity""#))
        .count()
}
