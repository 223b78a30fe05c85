use crate::crud::validate::require;
use crate::crud::{Resource, ServiceError, Table};
use crate::entities::project;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named group of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<project::Model> for Project {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
}

pub struct Projects;

impl Resource for Projects {
    const KIND: &'static str = "project";
    const PATH: &'static str = "projects";

    type Record = Project;
    type CreateRequest = CreateProjectRequest;
    type UpdateRequest = UpdateProjectRequest;
    type Draft = NewProject;
    type Patch = UpdateProjectRequest;

    fn validate_create(request: CreateProjectRequest) -> Result<NewProject, ServiceError> {
        require("name", &request.name)?;
        Ok(NewProject {
            name: request.name,
            description: request.description,
        })
    }

    fn validate_update(
        request: UpdateProjectRequest,
    ) -> Result<UpdateProjectRequest, ServiceError> {
        if let Some(name) = &request.name {
            require("name", name)?;
        }
        Ok(request)
    }

    fn apply(project: &mut Project, patch: UpdateProjectRequest) {
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
    }

    fn touch(project: &mut Project, now: DateTime<Utc>) {
        project.updated_at = now;
    }

    fn id(project: &Project) -> i64 {
        project.id
    }
}

impl Table for Projects {
    type Entity = project::Entity;
    type Model = project::Model;
    type ActiveModel = project::ActiveModel;

    fn id_column() -> project::Column {
        project::Column::Id
    }

    fn created_at_column() -> project::Column {
        project::Column::CreatedAt
    }

    fn insert_model(draft: NewProject, now: DateTime<Utc>) -> project::ActiveModel {
        project::ActiveModel {
            name: ActiveValue::Set(draft.name),
            description: ActiveValue::Set(draft.description),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }

    fn update_model(project: &Project) -> project::ActiveModel {
        project::ActiveModel {
            name: ActiveValue::Set(project.name.clone()),
            description: ActiveValue::Set(project.description.clone()),
            updated_at: ActiveValue::Set(project.updated_at),
            ..Default::default()
        }
    }

    fn from_model(model: project::Model) -> Project {
        Project::from(model)
    }
}
