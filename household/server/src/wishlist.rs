//! Wishlist entries follow the same rules as notes and live in their own
//! table.

use crate::crud::{Resource, ServiceError, Table};
use crate::entities::wishlist;
use crate::note::{
    CardPatch, Color, CreateCardRequest, NewCard, UpdateCardRequest, validate_card_patch,
    validate_new_card,
};
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub color: Color,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<wishlist::Model> for Wishlist {
    fn from(model: wishlist::Model) -> Self {
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

pub struct Wishlists;

impl Resource for Wishlists {
    const KIND: &'static str = "wishlist";
    const PATH: &'static str = "wishlists";

    type Record = Wishlist;
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

    fn apply(wishlist: &mut Wishlist, patch: CardPatch) {
        wishlist.title = patch.title;
        if let Some(content) = patch.content {
            wishlist.content = content;
        }
        wishlist.color = patch.color;
    }

    fn touch(wishlist: &mut Wishlist, now: DateTime<Utc>) {
        wishlist.updated_at = now;
    }

    fn id(wishlist: &Wishlist) -> i64 {
        wishlist.id
    }
}

impl Table for Wishlists {
    type Entity = wishlist::Entity;
    type Model = wishlist::Model;
    type ActiveModel = wishlist::ActiveModel;

    fn id_column() -> wishlist::Column {
        wishlist::Column::Id
    }

    fn created_at_column() -> wishlist::Column {
        wishlist::Column::CreatedAt
    }

    fn insert_model(draft: NewCard, now: DateTime<Utc>) -> wishlist::ActiveModel {
        wishlist::ActiveModel {
            title: ActiveValue::Set(draft.title),
            content: ActiveValue::Set(draft.content),
            color: ActiveValue::Set(draft.color),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }

    fn update_model(wishlist: &Wishlist) -> wishlist::ActiveModel {
        wishlist::ActiveModel {
            title: ActiveValue::Set(wishlist.title.clone()),
            content: ActiveValue::Set(wishlist.content.clone()),
            color: ActiveValue::Set(wishlist.color),
            updated_at: ActiveValue::Set(wishlist.updated_at),
            ..Default::default()
        }
    }

    fn from_model(model: wishlist::Model) -> Wishlist {
        Wishlist::from(model)
    }
}
