use crate::{db::DbPool, entities::menu_item, errors::ServiceError, repositories::EntityRepository};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("price must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(custom = "non_negative")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[validate(custom = "non_negative")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
}

/// Restaurant menu. Deleting an item only hides it so past orders keep their lines.
#[derive(Clone, Debug)]
pub struct MenuService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<menu_item::Entity>,
}

impl MenuService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Menu item"),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<menu_item::Model>, ServiceError> {
        menu_item::Entity::find()
            .filter(menu_item::Column::IsDeleted.eq(false))
            .order_by_asc(menu_item::Column::Category)
            .order_by_asc(menu_item::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<menu_item::Model, ServiceError> {
        self.repo.get(id).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateMenuItemRequest,
    ) -> Result<menu_item::Model, ServiceError> {
        let created = self
            .repo
            .insert(menu_item::ActiveModel {
                name: Set(request.name),
                category: Set(request.category),
                price: Set(request.price.round_dp(2)),
                is_available: Set(request.is_available.unwrap_or(true)),
                is_deleted: Set(false),
                ..Default::default()
            })
            .await?;
        info!(menu_item_id = created.id, "menu item created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateMenuItemRequest,
    ) -> Result<menu_item::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let mut active: menu_item::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(price) = request.price {
            active.price = Set(price.round_dp(2));
        }
        if let Some(is_available) = request.is_available {
            active.is_available = Set(is_available);
        }
        self.repo.update(active).await
    }

    /// Soft delete
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<menu_item::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let mut active: menu_item::ActiveModel = existing.into();
        active.is_deleted = Set(true);
        active.is_available = Set(false);
        let hidden = self.repo.update(active).await?;
        info!(menu_item_id = id, "menu item hidden");
        Ok(hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_prices_are_rejected() {
        let request = CreateMenuItemRequest {
            name: "Chapati".into(),
            category: "Sides".into(),
            price: dec!(-1),
            is_available: None,
        };
        assert!(request.validate().is_err());

        let request = CreateMenuItemRequest {
            price: dec!(0),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
