//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{favorite, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        role: role_to_domain(m.role),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
        last_login_at: m.last_login_at,
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: User) -> DomainResult<()> {
        debug!("Creating user: {}", u.id);

        let model = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            role: Set(role_to_entity(u.role)),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
            last_login_at: Set(u.last_login_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, mut u: User) -> DomainResult<User> {
        let existing = user::Entity::find_by_id(&u.id).one(&self.db).await?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: u.id,
            });
        }

        u.updated_at = Utc::now();
        let model = user::ActiveModel {
            id: Set(u.id.clone()),
            username: Set(u.username.clone()),
            email: Set(u.email.clone()),
            password_hash: Set(u.password_hash.clone()),
            role: Set(role_to_entity(u.role)),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
            last_login_at: Set(u.last_login_at),
        };
        model.update(&self.db).await?;
        Ok(u)
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        if let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? {
            let mut active: user::ActiveModel = existing.into();
            active.last_login_at = Set(Some(Utc::now()));
            active.update(&self.db).await?;
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn add_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()> {
        let exists = favorite::Entity::find_by_id((user_id.to_string(), station_id.to_string()))
            .one(&self.db)
            .await?;
        if exists.is_some() {
            return Err(DomainError::Conflict(format!(
                "Station {} is already a favorite",
                station_id
            )));
        }

        let model = favorite::ActiveModel {
            user_id: Set(user_id.to_string()),
            station_id: Set(station_id.to_string()),
            created_at: Set(Utc::now()),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, station_id: &str) -> DomainResult<()> {
        let result = favorite::Entity::delete_by_id((user_id.to_string(), station_id.to_string()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Favorite",
                field: "station_id",
                value: station_id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_favorites(&self, user_id: &str) -> DomainResult<Vec<String>> {
        let models = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.station_id).collect())
    }
}
