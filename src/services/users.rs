use crate::{db::DbPool, entities::user, errors::ServiceError, repositories::EntityRepository};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
    #[validate(length(min = 1))]
    pub role: Option<String>,
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Staff accounts
#[derive(Clone, Debug)]
pub struct UserService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<user::Entity>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "User"),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<user::Model>, ServiceError> {
        user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<(), ServiceError> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(user::Column::Id.ne(id));
        }
        let existing = query
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        match existing {
            Some(_) => Err(ServiceError::Conflict(format!(
                "A user with email {} already exists",
                email
            ))),
            None => Ok(()),
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<user::Model, ServiceError> {
        self.ensure_email_free(&request.email, None).await?;
        let password_hash = hash_password(&request.password)?;

        let created = self
            .repo
            .insert(user::ActiveModel {
                name: Set(request.name),
                email: Set(request.email),
                password_hash: Set(password_hash),
                role: Set(request.role),
                ..Default::default()
            })
            .await?;
        info!(user_id = created.id, "user created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateUserRequest,
    ) -> Result<user::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        if let Some(email) = request.email.as_deref() {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let mut active: user::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(role) = request.role {
            active.role = Set(role);
        }
        if let Some(password) = request.password {
            active.password_hash = Set(hash_password(&password)?);
        }
        self.repo.update(active).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_are_salted() {
        let first = hash_password("s3cret").unwrap();
        let second = hash_password("s3cret").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("s3cret", &first));
        assert!(!verify_password("wrong", &first));
        assert!(!verify_password("s3cret", "not-a-hash"));
    }

    #[test]
    fn create_request_requires_every_field() {
        let request = CreateUserRequest {
            name: "Amina".into(),
            email: "".into(),
            password: "pw".into(),
            role: "".into(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("role"));
        assert!(!fields.contains_key("name"));
    }
}
