use crate::crud::validate::{choice, require};
use crate::crud::{Crud, CrudService, Resource, ServiceError, Store, Table};
use crate::entities::task;
use crate::project::Projects;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub use crate::entities::sea_orm_active_enums::{Priority, Status};

/// A to-do item, optionally filed under a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            priority: model.priority,
            due_date: model.due_date,
            project_id: model.project_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// JSON payload for creating a task. Empty `status` or `priority` fall back
/// to `todo` and `medium`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<i64>,
}

/// JSON payload for a partial task update. Absent fields are left alone;
/// `"dueDate": null` clears the due date.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Distinguishes an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

pub struct Tasks;

impl Resource for Tasks {
    const KIND: &'static str = "task";
    const PATH: &'static str = "tasks";

    type Record = Task;
    type CreateRequest = CreateTaskRequest;
    type UpdateRequest = UpdateTaskRequest;
    type Draft = NewTask;
    type Patch = TaskPatch;

    fn validate_create(request: CreateTaskRequest) -> Result<NewTask, ServiceError> {
        require("title", &request.title)?;
        let status = choice("status", request.status.as_deref().unwrap_or_default())?;
        let priority = choice("priority", request.priority.as_deref().unwrap_or_default())?;
        Ok(NewTask {
            title: request.title,
            description: request.description,
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            due_date: request.due_date,
            project_id: request.project_id,
        })
    }

    fn validate_update(request: UpdateTaskRequest) -> Result<TaskPatch, ServiceError> {
        if let Some(title) = &request.title {
            require("title", title)?;
        }
        // An empty status or priority counts as not supplied.
        let status = choice("status", request.status.as_deref().unwrap_or_default())?;
        let priority = choice("priority", request.priority.as_deref().unwrap_or_default())?;
        Ok(TaskPatch {
            title: request.title,
            description: request.description,
            status,
            priority,
            due_date: request.due_date,
        })
    }

    fn apply(task: &mut Task, patch: TaskPatch) {
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
    }

    fn touch(task: &mut Task, now: DateTime<Utc>) {
        task.updated_at = now;
    }

    fn id(task: &Task) -> i64 {
        task.id
    }
}

impl Table for Tasks {
    type Entity = task::Entity;
    type Model = task::Model;
    type ActiveModel = task::ActiveModel;

    fn id_column() -> task::Column {
        task::Column::Id
    }

    fn created_at_column() -> task::Column {
        task::Column::CreatedAt
    }

    fn insert_model(draft: NewTask, now: DateTime<Utc>) -> task::ActiveModel {
        task::ActiveModel {
            title: ActiveValue::Set(draft.title),
            description: ActiveValue::Set(draft.description),
            status: ActiveValue::Set(draft.status),
            priority: ActiveValue::Set(draft.priority),
            due_date: ActiveValue::Set(draft.due_date),
            project_id: ActiveValue::Set(draft.project_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }

    fn update_model(task: &Task) -> task::ActiveModel {
        task::ActiveModel {
            title: ActiveValue::Set(task.title.clone()),
            description: ActiveValue::Set(task.description.clone()),
            status: ActiveValue::Set(task.status),
            priority: ActiveValue::Set(task.priority),
            due_date: ActiveValue::Set(task.due_date),
            updated_at: ActiveValue::Set(task.updated_at),
            ..Default::default()
        }
    }

    fn from_model(model: task::Model) -> Task {
        Task::from(model)
    }
}

/// Task service that additionally checks the project reference on create.
pub struct TaskService {
    tasks: Arc<dyn Store<Tasks>>,
    projects: Arc<dyn Store<Projects>>,
    crud: CrudService<Tasks>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn Store<Tasks>>, projects: Arc<dyn Store<Projects>>) -> Self {
        Self {
            crud: CrudService::new(tasks.clone()),
            tasks,
            projects,
        }
    }

    async fn ensure_project_exists(&self, project_id: i64) -> Result<(), ServiceError> {
        match self.projects.get_by_id(project_id).await {
            Ok(_) => Ok(()),
            Err(ServiceError::NotFound { .. }) => Err(ServiceError::validation(format!(
                "project {project_id} does not exist"
            ))),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl Crud<Tasks> for TaskService {
    #[tracing::instrument(skip(self))]
    async fn create(&self, request: CreateTaskRequest) -> Result<Task, ServiceError> {
        let draft = Tasks::validate_create(request)?;
        if let Some(project_id) = draft.project_id {
            self.ensure_project_exists(project_id).await?;
        }
        self.tasks.create(draft).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Task, ServiceError> {
        self.crud.get_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        self.crud.list().await
    }

    async fn update(&self, id: i64, request: UpdateTaskRequest) -> Result<Task, ServiceError> {
        self.crud.update(id, request).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.crud.delete(id).await
    }
}
