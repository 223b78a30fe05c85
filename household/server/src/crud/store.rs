use super::{Resource, ServiceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Persistence port for one entity kind.
///
/// Implementations translate "no row matched" into
/// [`ServiceError::NotFound`]; every other failure is returned unchanged.
#[async_trait]
pub trait Store<R: Resource>: Send + Sync {
    /// Inserts the draft and returns the stored record with its generated id
    /// and timestamps.
    async fn create(&self, draft: R::Draft) -> Result<R::Record, ServiceError>;
    async fn get_by_id(&self, id: i64) -> Result<R::Record, ServiceError>;
    async fn list(&self) -> Result<Vec<R::Record>, ServiceError>;
    /// Writes every mutable column of an existing record.
    async fn update(&self, record: &R::Record) -> Result<(), ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// Maps a [`Resource`] onto its sea-orm entity.
pub trait Table: Resource {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + Sync
        + 'static;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;
    fn created_at_column() -> <Self::Entity as EntityTrait>::Column;
    /// Row for a new record. The id is left unset for the database to
    /// generate.
    fn insert_model(draft: Self::Draft, now: DateTime<Utc>) -> Self::ActiveModel;
    /// Mutable columns of an existing record. Id and creation time are left
    /// unset so they can never be rewritten.
    fn update_model(record: &Self::Record) -> Self::ActiveModel;
    fn from_model(model: Self::Model) -> Self::Record;
}

/// [`Store`] backed by a sea-orm connection. Every call runs under a
/// deadline; a call that exceeds it is dropped and reported as
/// [`ServiceError::Timeout`].
pub struct SeaOrmStore<R> {
    db: Arc<DatabaseConnection>,
    timeout: Duration,
    resource: PhantomData<fn() -> R>,
}

impl<R: Table> SeaOrmStore<R> {
    pub fn new(db: Arc<DatabaseConnection>, timeout: Duration) -> Self {
        Self {
            db,
            timeout,
            resource: PhantomData,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout))?
            .map_err(ServiceError::from)
    }
}

#[async_trait]
impl<R: Table> Store<R> for SeaOrmStore<R> {
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn create(&self, draft: R::Draft) -> Result<R::Record, ServiceError> {
        let active_model = R::insert_model(draft, Utc::now());
        let created_model = self.bounded(active_model.insert(self.db.as_ref())).await?;
        Ok(R::from_model(created_model))
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn get_by_id(&self, id: i64) -> Result<R::Record, ServiceError> {
        let model = self
            .bounded(
                R::Entity::find()
                    .filter(R::id_column().eq(id))
                    .one(self.db.as_ref()),
            )
            .await?
            .ok_or(ServiceError::not_found(R::KIND, id))?;
        Ok(R::from_model(model))
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn list(&self) -> Result<Vec<R::Record>, ServiceError> {
        let models = self
            .bounded(
                R::Entity::find()
                    .order_by_desc(R::created_at_column())
                    .order_by_desc(R::id_column())
                    .all(self.db.as_ref()),
            )
            .await?;
        Ok(models.into_iter().map(R::from_model).collect())
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn update(&self, record: &R::Record) -> Result<(), ServiceError> {
        let id = R::id(record);
        let result = self
            .bounded(
                R::Entity::update_many()
                    .set(R::update_model(record))
                    .filter(R::id_column().eq(id))
                    .exec(self.db.as_ref()),
            )
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(R::KIND, id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = self
            .bounded(
                R::Entity::delete_many()
                    .filter(R::id_column().eq(id))
                    .exec(self.db.as_ref()),
            )
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(R::KIND, id));
        }
        Ok(())
    }
}
