use crate::{db::DbPool, entities::supplier, errors::ServiceError, repositories::EntityRepository};
use sea_orm::{EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for managing suppliers
#[derive(Clone, Debug)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<supplier::Entity>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Supplier"),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        supplier::Entity::find()
            .order_by_asc(supplier::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        self.repo.get(id).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateSupplierRequest) -> Result<supplier::Model, ServiceError> {
        let created = self
            .repo
            .insert(supplier::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(request.name),
                contact_name: Set(request.contact_name),
                email: Set(request.email),
                phone: Set(request.phone),
                address: Set(request.address),
            })
            .await?;
        info!(supplier_id = %created.id, "supplier created");
        Ok(created)
    }
}
