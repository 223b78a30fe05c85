//! The create / read / update / delete pipeline shared by every entity kind.
//!
//! An entity kind plugs in by implementing [`Resource`]; the pipeline itself
//! lives in [`CrudService`], which validates a request, loads and mutates
//! the record where needed, and hands it to a [`Store`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

pub mod store;
pub mod validate;

pub use store::{SeaOrmStore, Store, Table};

/// Coarse classification of a [`ServiceError`], used by the HTTP boundary to
/// pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Internal,
}

/// Error type for CRUD service and store operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request broke a field rule. Nothing was written.
    #[error("{0}")]
    Validation(String),
    /// No row with this id exists for the entity kind.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// The storage call did not finish before its deadline.
    #[error("Database call did not finish within {0:?}")]
    Timeout(Duration),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::Database(_) | ServiceError::Timeout(_) => ErrorKind::Internal,
        }
    }
}

/// The capability set an entity kind provides to the CRUD pipeline.
///
/// Validation is pure: `validate_create` and `validate_update` turn a raw
/// request into a typed [`Resource::Draft`] or [`Resource::Patch`] without
/// touching storage, so a rejected request never has a side effect.
pub trait Resource: Send + Sync + 'static {
    /// Entity name used in not-found messages.
    const KIND: &'static str;
    /// Route segment under `/api`.
    const PATH: &'static str;

    type Record: Clone + Debug + PartialEq + Send + Sync + Serialize + 'static;
    type CreateRequest: Debug + Send + DeserializeOwned + 'static;
    type UpdateRequest: Debug + Send + DeserializeOwned + 'static;
    /// A validated create request with defaults filled in.
    type Draft: Debug + Send + 'static;
    /// A validated update request; only the fields it carries are applied.
    type Patch: Debug + Send + 'static;

    fn validate_create(request: Self::CreateRequest) -> Result<Self::Draft, ServiceError>;
    fn validate_update(request: Self::UpdateRequest) -> Result<Self::Patch, ServiceError>;
    fn apply(record: &mut Self::Record, patch: Self::Patch);
    /// Bumps the record's modification timestamp.
    fn touch(record: &mut Self::Record, now: DateTime<Utc>);
    fn id(record: &Self::Record) -> i64;
}

/// Service contract exposed to the HTTP layer for one entity kind.
#[async_trait]
pub trait Crud<R: Resource>: Send + Sync {
    async fn create(&self, request: R::CreateRequest) -> Result<R::Record, ServiceError>;
    async fn get_by_id(&self, id: i64) -> Result<R::Record, ServiceError>;
    /// Newest first. Empty when the table is empty.
    async fn list(&self) -> Result<Vec<R::Record>, ServiceError>;
    async fn update(&self, id: i64, request: R::UpdateRequest)
    -> Result<R::Record, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

pub struct CrudService<R: Resource> {
    store: Arc<dyn Store<R>>,
}

impl<R: Resource> CrudService<R> {
    pub fn new(store: Arc<dyn Store<R>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R: Resource> Crud<R> for CrudService<R> {
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn create(&self, request: R::CreateRequest) -> Result<R::Record, ServiceError> {
        let draft = R::validate_create(request)?;
        self.store.create(draft).await
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn get_by_id(&self, id: i64) -> Result<R::Record, ServiceError> {
        self.store.get_by_id(id).await
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn list(&self) -> Result<Vec<R::Record>, ServiceError> {
        self.store.list().await
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn update(
        &self,
        id: i64,
        request: R::UpdateRequest,
    ) -> Result<R::Record, ServiceError> {
        let patch = R::validate_update(request)?;
        let mut record = self.store.get_by_id(id).await?;
        R::apply(&mut record, patch);
        R::touch(&mut record, Utc::now());
        // The store re-checks existence, so a delete that lands between the
        // read above and this write still reports not found.
        self.store.update(&record).await?;
        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{
        CreateTaskRequest, NewTask, Priority, Status, Task, TaskPatch, Tasks, UpdateTaskRequest,
    };
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub TaskStore {}

        #[async_trait]
        impl Store<Tasks> for TaskStore {
            async fn create(&self, draft: NewTask) -> Result<Task, ServiceError>;
            async fn get_by_id(&self, id: i64) -> Result<Task, ServiceError>;
            async fn list(&self) -> Result<Vec<Task>, ServiceError>;
            async fn update(&self, record: &Task) -> Result<(), ServiceError>;
            async fn delete(&self, id: i64) -> Result<(), ServiceError>;
        }
    }

    fn stored_task(id: i64) -> Task {
        let created_at = DateTime::parse_from_rfc3339("2025-06-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Task {
            id,
            title: "Water the plants".to_string(),
            description: "Balcony first".to_string(),
            status: Status::Todo,
            priority: Priority::Low,
            due_date: None,
            project_id: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn service(store: MockTaskStore) -> CrudService<Tasks> {
        CrudService::new(Arc::new(store))
    }

    #[test]
    fn can_tag_errors_by_kind() {
        assert_eq!(
            ServiceError::validation("title is required").kind(),
            ErrorKind::Validation
        );
        assert_eq!(ServiceError::not_found("task", 7).kind(), ErrorKind::NotFound);
        assert_eq!(
            ServiceError::Database(sea_orm::DbErr::Custom("boom".to_string())).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            ServiceError::Timeout(Duration::from_millis(10)).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn can_describe_not_found_with_entity_and_id() {
        assert_eq!(
            ServiceError::not_found("note", 42).to_string(),
            "note with id 42 not found"
        );
    }

    #[tokio::test]
    async fn can_pass_defaulted_draft_to_store() {
        let mut store = MockTaskStore::new();
        store
            .expect_create()
            .withf(|draft: &NewTask| {
                draft.title == "Buy groceries"
                    && draft.status == Status::Todo
                    && draft.priority == Priority::Medium
            })
            .times(1)
            .returning(|draft| {
                let mut task = stored_task(1);
                task.title = draft.title;
                task.priority = draft.priority;
                Ok(task)
            });

        let created = service(store)
            .create(CreateTaskRequest {
                title: "Buy groceries".to_string(),
                ..Default::default()
            })
            .await
            .expect("Failed to create task");

        assert_eq!(created.id, 1);
        assert_eq!(created.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn can_reject_create_without_touching_store() {
        let mut store = MockTaskStore::new();
        store.expect_create().never();

        let result = service(store).create(CreateTaskRequest::default()).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn can_reject_update_before_loading_record() {
        let mut store = MockTaskStore::new();
        store.expect_get_by_id().never();
        store.expect_update().never();

        let result = service(store)
            .update(
                3,
                UpdateTaskRequest {
                    status: Some("finished".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let err = result.expect_err("invalid status should be rejected");
        assert_eq!(
            err.to_string(),
            "invalid status: must be todo, in_progress, or done"
        );
    }

    #[tokio::test]
    async fn can_apply_only_supplied_fields_on_update() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_by_id()
            .with(eq(5))
            .times(1)
            .returning(|id| Ok(stored_task(id)));
        store
            .expect_update()
            .withf(|task: &Task| {
                task.title == "Water the plants"
                    && task.description == "Balcony first"
                    && task.status == Status::Done
                    && task.priority == Priority::Low
            })
            .times(1)
            .returning(|_| Ok(()));

        let updated = service(store)
            .update(
                5,
                UpdateTaskRequest {
                    status: Some("done".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to update task");

        assert_eq!(updated.status, Status::Done);
        assert_eq!(updated.created_at, stored_task(5).created_at);
        assert!(updated.updated_at > updated.created_at);
    }

    #[tokio::test]
    async fn can_report_not_found_when_record_vanishes_before_write() {
        let mut store = MockTaskStore::new();
        store
            .expect_get_by_id()
            .returning(|id| Ok(stored_task(id)));
        store
            .expect_update()
            .returning(|task| Err(ServiceError::not_found("task", task.id)));

        let result = service(store)
            .update(
                9,
                UpdateTaskRequest {
                    title: Some("Too late".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let err = result.expect_err("update should fail");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn can_propagate_store_errors_unchanged() {
        let mut store = MockTaskStore::new();
        store
            .expect_list()
            .returning(|| Err(ServiceError::Timeout(Duration::from_millis(50))));

        let result = service(store).list().await;

        assert!(matches!(result, Err(ServiceError::Timeout(_))));
    }

    #[test]
    fn can_build_patch_that_keeps_unset_fields() {
        let patch = Tasks::validate_update(UpdateTaskRequest {
            priority: Some(String::new()),
            ..Default::default()
        })
        .expect("empty priority is treated as unset");

        assert_eq!(patch, TaskPatch::default());
    }
}
