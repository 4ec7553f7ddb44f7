//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn create(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Update profile fields (username/email) and `updated_at`
    async fn update(&self, user: User) -> DomainResult<User>;

    async fn record_login(&self, id: &str) -> DomainResult<()>;

    /// Total number of users (bootstrap uses this to seed a default admin)
    async fn count(&self) -> DomainResult<u64>;

    // Favorite stations
    async fn add_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()>;
    async fn remove_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()>;
    async fn list_favorites(&self, user_id: &str) -> DomainResult<Vec<String>>;
}
