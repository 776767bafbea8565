//! User repository.

use std::sync::Arc;

use crate::entities::{user, User};
use sea_orm::{sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use warbler_common::{AppError, AppResult};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by their API key.
    pub async fn find_by_api_key(&self, api_key: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::ApiKey.eq(api_key))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set `last_activity` to now. Returns the number of rows touched.
    pub async fn touch_last_activity(&self, id: i32) -> AppResult<u64> {
        let now = chrono::Utc::now().fixed_offset();
        let result = User::update_many()
            .col_expr(user::Column::LastActivity, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_user(id: i32, name: &str, api_key: &str) -> user::Model {
        user::Model {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            api_key: Some(api_key.to_string()),
            last_activity: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_api_key_found() {
        let user = create_test_user(1, "User_name_1", "key1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_api_key("key1").await.unwrap();

        assert_eq!(result, Some(user));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id(42).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_touch_last_activity_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert_eq!(repo.touch_last_activity(1).await.unwrap(), 1);
        assert_eq!(repo.touch_last_activity(99).await.unwrap(), 0);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let user = create_test_user(1, "User_name_1", "key1");
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("api_key").is_none());
        assert_eq!(json["name"], "User_name_1");
    }
}
