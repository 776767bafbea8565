//! User service.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use warbler_common::{AppError, AppResult};
use warbler_db::{
    entities::user,
    repositories::{EdgeLabel, FollowEdgeRepository, UserRepository},
};

/// A user's public columns with both sides of their follow graph.
///
/// The API key never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub last_activity: DateTime<FixedOffset>,
    pub followers: Vec<EdgeLabel>,
    pub following: Vec<EdgeLabel>,
}

/// User service for identity lookups.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    edge_repo: FollowEdgeRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, edge_repo: FollowEdgeRepository) -> Self {
        Self {
            user_repo,
            edge_repo,
        }
    }

    /// Resolve an API key to a bare user, for request authentication.
    pub async fn authenticate(&self, api_key: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_api_key(api_key)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Profile of the user owning `api_key`.
    pub async fn find_by_token(&self, api_key: &str) -> AppResult<UserProfile> {
        let user = self
            .user_repo
            .find_by_api_key(api_key)
            .await?
            .ok_or_else(|| AppError::UserNotFound("no user for this api key".to_string()))?;

        self.profile(user).await
    }

    /// Profile of user `id`.
    pub async fn find_by_id(&self, id: i32) -> AppResult<UserProfile> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;

        self.profile(user).await
    }

    async fn profile(&self, user: user::Model) -> AppResult<UserProfile> {
        let followers = self.edge_repo.followers_of(user.id).await?;
        let following = self.edge_repo.following_of(user.id).await?;

        Ok(UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            last_activity: user.last_activity,
            followers,
            following,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_user(id: i32) -> user::Model {
        user::Model {
            id,
            name: format!("User_name_{id}"),
            email: format!("user{id}email@email.com"),
            api_key: Some(format!("key{id}")),
            last_activity: Utc::now().into(),
        }
    }

    fn label(id: i32, name: &str) -> BTreeMap<&'static str, Value> {
        maplit::btreemap! {
            "id" => Value::Int(Some(id)),
            "name" => Value::from(name),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_builds_seeded_profile() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(2)]])
                .into_connection(),
        );
        let edge_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[label(3, "User_name_3")]])
                .append_query_results([[label(1, "User_name_1")]])
                .into_connection(),
        );

        let service = UserService::new(
            UserRepository::new(user_db),
            FollowEdgeRepository::new(edge_db),
        );
        let profile = service.find_by_id(2).await.unwrap();

        assert_eq!(profile.name, "User_name_2");
        assert_eq!(profile.email, "user2email@email.com");
        assert_eq!(
            profile.followers,
            vec![EdgeLabel {
                id: 3,
                name: "User_name_3".to_string()
            }]
        );
        assert_eq!(
            profile.following,
            vec![EdgeLabel {
                id: 1,
                name: "User_name_1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_find_by_token_unknown_key() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let edge_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(
            UserRepository::new(user_db),
            FollowEdgeRepository::new(edge_db),
        );
        let result = service.find_by_token("nope").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_key_is_unauthorized() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let edge_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(
            UserRepository::new(user_db),
            FollowEdgeRepository::new(edge_db),
        );

        assert!(matches!(
            service.authenticate("nope").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_profile_serializes_public_columns() {
        let last_activity = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+09:00").unwrap();
        let profile = UserProfile {
            id: 2,
            name: "User_name_2".to_string(),
            email: "user2email@email.com".to_string(),
            last_activity,
            followers: vec![EdgeLabel {
                id: 3,
                name: "User_name_3".to_string(),
            }],
            following: vec![],
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["email"], "user2email@email.com");
        assert_eq!(json["last_activity"], "2024-05-01T12:00:00+09:00");
        assert_eq!(json["followers"][0]["id"], 3);
        assert_eq!(json["following"], serde_json::json!([]));
        assert!(json.get("api_key").is_none());
    }
}
