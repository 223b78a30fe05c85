use crate::crud::{Crud, ErrorKind, Resource, ServiceError};
use crate::note::{Color, CreateCardRequest, Note, UpdateCardRequest};
use crate::project::{CreateProjectRequest, Project, UpdateProjectRequest};
use crate::shopping::{CreateShoppingItemRequest, ShoppingItem, UpdateShoppingItemRequest};
use crate::task::{CreateTaskRequest, Priority, Status, Task, UpdateTaskRequest};
use crate::wishlist::Wishlist;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error type for API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The body was not JSON or did not fit the request shape.
    #[error("invalid request body")]
    InvalidBody(#[from] JsonRejection),
    /// The `{id}` path segment is not an integer.
    #[error("invalid id")]
    InvalidId(#[from] PathRejection),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Service(err) => match err.kind() {
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, err.to_string()),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                ErrorKind::Internal => {
                    tracing::error!("Request failed: {}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
            ApiError::InvalidBody(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::InvalidId(rejection) => {
                tracing::debug!("Rejected id: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

type CrudState<R> = State<Arc<dyn Crud<R>>>;

#[tracing::instrument(skip(service), fields(kind = R::KIND))]
pub async fn list_handler<R: Resource>(
    State(service): CrudState<R>,
) -> Result<Json<Vec<R::Record>>, ApiError> {
    let records = service.list().await?;
    Ok(Json(records))
}

#[tracing::instrument(skip(service), fields(kind = R::KIND))]
pub async fn create_handler<R: Resource>(
    State(service): CrudState<R>,
    WithRejection(Json(request), _): WithRejection<Json<R::CreateRequest>, ApiError>,
) -> Result<(StatusCode, Json<R::Record>), ApiError> {
    let record = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[tracing::instrument(skip(service), fields(kind = R::KIND))]
pub async fn get_handler<R: Resource>(
    State(service): CrudState<R>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<R::Record>, ApiError> {
    let record = service.get_by_id(id).await?;
    Ok(Json(record))
}

#[tracing::instrument(skip(service), fields(kind = R::KIND))]
pub async fn update_handler<R: Resource>(
    State(service): CrudState<R>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<R::UpdateRequest>, ApiError>,
) -> Result<Json<R::Record>, ApiError> {
    let record = service.update(id, request).await?;
    Ok(Json(record))
}

#[tracing::instrument(skip(service), fields(kind = R::KIND))]
pub async fn delete_handler<R: Resource>(
    State(service): CrudState<R>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Registers the five CRUD routes of one entity kind under `/api/<path>`.
pub fn resource_router<R: Resource>(service: Arc<dyn Crud<R>>) -> Router {
    let collection = format!("/api/{}", R::PATH);
    let item = format!("/api/{}/{{id}}", R::PATH);
    Router::new()
        .route(
            &collection,
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            &item,
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Household API", description = "Tasks, projects, notes, wishlists and shopping items"),
    components(schemas(
        Task,
        CreateTaskRequest,
        UpdateTaskRequest,
        Status,
        Priority,
        Project,
        CreateProjectRequest,
        UpdateProjectRequest,
        Note,
        Wishlist,
        CreateCardRequest,
        UpdateCardRequest,
        Color,
        ShoppingItem,
        CreateShoppingItemRequest,
        UpdateShoppingItemRequest,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Handler for GET /api/openapi.json.
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
