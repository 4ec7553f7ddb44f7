//! User account and favorites business logic

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::domain::station::Station;
use crate::domain::user::{User, UserRole};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Service for user registration, authentication, profile and favorites
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        self.register_with_role(username, email, password, UserRole::User)
            .await
    }

    pub async fn register_with_role(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        if self.repos.users().find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict(format!("email {}", email)));
        }
        if self
            .repos
            .users()
            .find_by_username(username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!("username {}", username)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.repos.users().create(user.clone()).await?;
        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify credentials. Failures are reported uniformly so an attacker
    /// cannot probe which emails are registered.
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<User> {
        let invalid = || DomainError::Unauthorized("invalid email or password".to_string());

        let user = self
            .repos
            .users()
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !user.is_active {
            return Err(DomainError::Unauthorized("account is disabled".to_string()));
        }
        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        self.repos.users().record_login(&user.id).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    pub async fn get_profile(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        username: Option<String>,
        email: Option<String>,
    ) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(email) = email {
            if email != user.email {
                if self.repos.users().find_by_email(&email).await?.is_some() {
                    return Err(DomainError::Conflict(format!("email {}", email)));
                }
                user.email = email;
            }
        }
        if let Some(username) = username {
            if username != user.username {
                if self
                    .repos
                    .users()
                    .find_by_username(&username)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::Conflict(format!("username {}", username)));
                }
                user.username = username;
            }
        }

        self.repos.users().update(user).await
    }

    pub async fn add_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()> {
        // reject favorites pointing at nothing
        if self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.to_string(),
            });
        }
        self.repos.users().add_favorite(user_id, station_id).await
    }

    pub async fn remove_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()> {
        self.repos
            .users()
            .remove_favorite(user_id, station_id)
            .await
    }

    /// Favorite stations, resolved. Stations deleted since being favorited
    /// are skipped.
    pub async fn list_favorites(&self, user_id: &str) -> DomainResult<Vec<Station>> {
        let ids = self.repos.users().list_favorites(user_id).await?;
        let mut stations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(station) = self.repos.stations().find_by_id(&id).await? {
                stations.push(station);
            }
        }
        Ok(stations)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::{
        Address, ConnectorCapacity, ConnectorType, Pricing, StationStatus,
    };
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;

    fn service() -> (Arc<InMemoryRepositoryProvider>, UserService) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        (repos.clone(), UserService::new(repos))
    }

    async fn seed_station(repos: &InMemoryRepositoryProvider, id: &str) {
        let now = Utc::now();
        repos
            .stations()
            .save(Station {
                id: id.into(),
                name: format!("Station {id}"),
                address: Address::default(),
                latitude: 0.0,
                longitude: 0.0,
                connectors: vec![ConnectorCapacity {
                    connector_type: ConnectorType::Ccs,
                    power_kw: 50.0,
                    count: 1,
                    available: 1,
                }],
                pricing: Pricing::default(),
                status: StationStatus::Active,
                total_ports: 1,
                available_ports: 1,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn register_and_authenticate() {
        let (_, svc) = service();
        let user = svc
            .register("alice", "alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::User);

        let logged_in = svc
            .authenticate("alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (_, svc) = service();
        svc.register("alice", "alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
        let err = svc
            .register("alice2", "alice@example.com", "hunter2hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (_, svc) = service();
        svc.register("alice", "alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
        let err = svc
            .authenticate("alice@example.com", "nope-nope-nope")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized_not_not_found() {
        let (_, svc) = service();
        let err = svc
            .authenticate("ghost@example.com", "whatever-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn favorites_roundtrip() {
        let (repos, svc) = service();
        seed_station(&repos, "st-1").await;
        let user = svc
            .register("bob", "bob@example.com", "hunter2hunter2")
            .await
            .unwrap();

        svc.add_favorite(&user.id, "st-1").await.unwrap();
        let favorites = svc.list_favorites(&user.id).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "st-1");

        svc.remove_favorite(&user.id, "st-1").await.unwrap();
        assert!(svc.list_favorites(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_favorite_is_conflict() {
        let (repos, svc) = service();
        seed_station(&repos, "st-1").await;
        let user = svc
            .register("bob", "bob@example.com", "hunter2hunter2")
            .await
            .unwrap();

        svc.add_favorite(&user.id, "st-1").await.unwrap();
        let err = svc.add_favorite(&user.id, "st-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn favorite_of_unknown_station_is_not_found() {
        let (_, svc) = service();
        let user = svc
            .register("bob", "bob@example.com", "hunter2hunter2")
            .await
            .unwrap();
        let err = svc.add_favorite(&user.id, "ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_profile_rejects_taken_email() {
        let (_, svc) = service();
        svc.register("alice", "alice@example.com", "hunter2hunter2")
            .await
            .unwrap();
        let bob = svc
            .register("bob", "bob@example.com", "hunter2hunter2")
            .await
            .unwrap();

        let err = svc
            .update_profile(&bob.id, None, Some("alice@example.com".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
