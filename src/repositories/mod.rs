use crate::errors::ServiceError;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};
use std::{fmt, marker::PhantomData, sync::Arc};

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Plain CRUD over a single sea-orm entity.
///
/// Relational reads and multi-row writes live in the services; this only
/// covers the single-table cases every resource shares.
pub struct EntityRepository<E> {
    base: BaseRepository,
    label: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            label: self.label,
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for EntityRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRepository")
            .field("entity", &self.label)
            .finish()
    }
}

impl<E> Repository for EntityRepository<E> {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}

impl<E> EntityRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    /// `label` names the entity in not-found messages ("Room 4 not found").
    pub fn new(db: Arc<DatabaseConnection>, label: &'static str) -> Self {
        Self {
            base: BaseRepository::new(db),
            label,
            _entity: PhantomData,
        }
    }

    pub async fn find_by_id<K>(&self, id: K) -> Result<Option<E::Model>, ServiceError>
    where
        K: Into<PrimaryKeyOf<E>>,
    {
        E::find_by_id(id)
            .one(self.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Like [`Self::find_by_id`] but a missing row is a `NotFound` error.
    pub async fn get<K>(&self, id: K) -> Result<E::Model, ServiceError>
    where
        K: Into<PrimaryKeyOf<E>> + fmt::Display + Copy,
    {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(self.label, id))
    }

    pub async fn find_all(&self) -> Result<Vec<E::Model>, ServiceError> {
        E::find()
            .all(self.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn insert(&self, model: E::ActiveModel) -> Result<E::Model, ServiceError> {
        model
            .insert(self.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn update(&self, model: E::ActiveModel) -> Result<E::Model, ServiceError> {
        model
            .update(self.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Hard delete. Returns `NotFound` when no row matched.
    pub async fn delete_by_id<K>(&self, id: K) -> Result<(), ServiceError>
    where
        K: Into<PrimaryKeyOf<E>> + fmt::Display + Copy,
    {
        let result = E::delete_by_id(id)
            .exec(self.get_db())
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(self.label, id));
        }
        Ok(())
    }
}
