//! Category API handlers.

use axum::{Json, extract::State, http::StatusCode};
use corner_cms::content::Category;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, ErrorResponse, store_error};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryPayload {
    pub name: String,
    pub slug: String,
}

/// Render a category into the API envelope.
fn category_attributes(category: &Category) -> Value {
    json!({
        "name": category.name,
        "slug": category.slug,
        "createdAt": category.created_at,
        "updatedAt": category.updated_at,
    })
}

/// List all categories (`GET /api/categories`).
///
/// # Response
///
/// ```json
/// { "data": [ { "id": "…", "attributes": { "name": "News", "slug": "news", … } } ] }
/// ```
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let categories = state.content.list_categories().await.map_err(store_error)?;

    let data: Vec<Value> = categories
        .iter()
        .map(|category| {
            json!({
                "id": category.id,
                "attributes": category_attributes(category),
            })
        })
        .collect();

    Ok(Json(json!({ "data": data })))
}

/// Create a category (`POST /api/categories`, bearer token required).
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let category = Category::new(payload.name, payload.slug);
    state
        .content
        .insert_category(category.clone())
        .await
        .map_err(store_error)?;

    Ok(Json(json!({
        "data": {
            "id": category.id,
            "attributes": category_attributes(&category),
        },
    })))
}
