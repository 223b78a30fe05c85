use crate::crud::validate::require;
use crate::crud::{Resource, ServiceError, Table};
use crate::entities::shopping_item;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One line on the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shopping_item::Model> for ShoppingItem {
    fn from(model: shopping_item::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateShoppingItemRequest {
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShoppingItemRequest {
    pub title: Option<String>,
}

pub struct ShoppingItems;

impl Resource for ShoppingItems {
    const KIND: &'static str = "shopping item";
    const PATH: &'static str = "shopping";

    type Record = ShoppingItem;
    type CreateRequest = CreateShoppingItemRequest;
    type UpdateRequest = UpdateShoppingItemRequest;
    type Draft = String;
    type Patch = Option<String>;

    fn validate_create(request: CreateShoppingItemRequest) -> Result<String, ServiceError> {
        require("title", &request.title)?;
        Ok(request.title)
    }

    fn validate_update(request: UpdateShoppingItemRequest) -> Result<Option<String>, ServiceError> {
        if let Some(title) = &request.title {
            require("title", title)?;
        }
        Ok(request.title)
    }

    fn apply(item: &mut ShoppingItem, title: Option<String>) {
        if let Some(title) = title {
            item.title = title;
        }
    }

    fn touch(item: &mut ShoppingItem, now: DateTime<Utc>) {
        item.updated_at = now;
    }

    fn id(item: &ShoppingItem) -> i64 {
        item.id
    }
}

impl Table for ShoppingItems {
    type Entity = shopping_item::Entity;
    type Model = shopping_item::Model;
    type ActiveModel = shopping_item::ActiveModel;

    fn id_column() -> shopping_item::Column {
        shopping_item::Column::Id
    }

    fn created_at_column() -> shopping_item::Column {
        shopping_item::Column::CreatedAt
    }

    fn insert_model(title: String, now: DateTime<Utc>) -> shopping_item::ActiveModel {
        shopping_item::ActiveModel {
            title: ActiveValue::Set(title),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
    }

    fn update_model(item: &ShoppingItem) -> shopping_item::ActiveModel {
        shopping_item::ActiveModel {
            title: ActiveValue::Set(item.title.clone()),
            updated_at: ActiveValue::Set(item.updated_at),
            ..Default::default()
        }
    }

    fn from_model(model: shopping_item::Model) -> ShoppingItem {
        ShoppingItem::from(model)
    }
}
