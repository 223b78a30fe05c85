use crate::crud::validate::{choice, require};
use crate::crud::{Resource, ServiceError, Table};
use crate::entities::note;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::entities::sea_orm_active_enums::Color;

/// A sticky note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub color: Color,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<note::Model> for Note {
    fn from(model: note::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            color: model.color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create payload shared by notes and wishlist entries. `title` and `color`
/// are both required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCardRequest {
    pub title: String,
    pub content: String,
    pub color: String,
}

/// Update payload shared by notes and wishlist entries.
///
/// Unlike a task update, `title` and `color` must always be supplied and
/// non-empty; only `content` may be left out.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub title: String,
    pub content: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPatch {
    pub title: String,
    pub content: Option<String>,
    pub color: Color,
}

pub(crate) fn validate_new_card(request: CreateCardRequest) -> Result<NewCard, ServiceError> {
    require("title", &request.title)?;
    require("color", &request.color)?;
    let color = choice("color", &request.color)?.unwrap_or_default();
    Ok(NewCard {
        title: request.title,
        content: request.content,
        color,
    })
}

pub(crate) fn validate_card_patch(request: UpdateCardRequest) -> Result<CardPatch, ServiceError> {
    require("title", &request.title)?;
    require("color", &request.color)?;
    let color = choice("color", &request.color)?.unwrap_or_default();
    Ok(CardPatch {
        title: request.title,
        content: request.content,
        color,
    })
}

pub struct Notes;

impl Resource for Notes {
    const KIND: &'static str = "note";
    const PATH: &'static str = "notes";

    type Record = Note;
    type CreateRequest = CreateCardRequest;
    type UpdateRequest = UpdateCardRequest;
    type Draft = NewCard;
    type Patch = CardPatch;

    fn validate_create(request: CreateCardRequest) -> Result<NewCard, ServiceError> {
        validate_new_card(request)
    }

    fn validate_update(request: UpdateCardRequest) -> Result<CardPatch, ServiceError> {
        validate_card_patch(request)
    }

    fn apply(note: &mut Note, patch: CardPatch) {
        note.title = patch.title;
        if let Some(content) = patch.content {
            note.content = content;
        }
        note.color = patch.color;
    }

    fn touch(note: &mut Note, now: DateTime<Utc>) {
        note.updated_at = now;
    }

    fn id(note: &Note) -> i64 {
        note.id
    }
}

impl Table for Notes {
    type Entity = note::Entity;
    type Model = note::Model;
    type ActiveModel = note::ActiveModel;

    fn id_column() -> note::Column {
        note::Column::Id
    }

    fn created_at_column() -> note::Column {
        note::Column::CreatedAt
    }

    fn insert_model(draft: NewCard, now: DateTime<Utc>) -> note::ActiveModel {
        note::ActiveModel {
            title: ActiveValue::Set(draft.title),
            content: ActiveValue::Set(draft.content),
            color: ActiveValue::Set(draft.color),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }

    fn update_model(note: &Note) -> note::ActiveModel {
        note::ActiveModel {
            title: ActiveValue::Set(note.title.clone()),
            content: ActiveValue::Set(note.content.clone()),
            color: ActiveValue::Set(note.color),
            updated_at: ActiveValue::Set(note.updated_at),
            ..Default::default()
        }
    }

    fn from_model(model: note::Model) -> Note {
        Note::from(model)
    }
}
