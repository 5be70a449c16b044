//! Article API handlers.
//!
//! Listing supports the front-end's filter/sort/pagination parameters and
//! optional relation population; fetching an article bumps its view
//! counter; creation requires a bearer token and stamps the author from
//! the verified claims.
//!
//! # Examples
//!
//! List featured articles with relations:
//! ```bash
//! curl "http://localhost:8001/api/articles?filters_is_featured=true&populate=*"
//! ```

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use corner_cms::auth::AccessTokenClaims;
use corner_cms::content::{Article, ArticleQuery, ArticleSort};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{AppState, ErrorResponse, store_error};
use crate::metrics;

/// Query parameters accepted by `GET /api/articles`.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    pub filters_slug: Option<String>,
    pub filters_category_slug: Option<String>,
    pub filters_is_featured: Option<bool>,
    pub sort: Option<String>,
    #[serde(default = "default_limit")]
    pub pagination_limit: i64,
    #[serde(default)]
    pub pagination_start: i64,
    pub populate: Option<String>,
}

fn default_limit() -> i64 {
    25
}

/// Query parameters accepted by `GET /api/articles/{id}`.
#[derive(Debug, Deserialize)]
pub struct ArticleGetParams {
    pub populate: Option<String>,
}

/// Request body for `POST /api/articles`.
#[derive(Debug, Deserialize)]
pub struct CreateArticlePayload {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub is_featured: bool,
}

fn article_attributes(article: &Article) -> Value {
    json!({
        "title": article.title,
        "slug": article.slug,
        "excerpt": article.excerpt,
        "content": article.content,
        "featured_image": article.featured_image,
        "views": article.views,
        "is_featured": article.is_featured,
        "publishedAt": article.published_at,
        "createdAt": article.created_at,
        "updatedAt": article.updated_at,
    })
}

/// Attach category and author relations to an article envelope.
async fn populate_relations(
    state: &AppState,
    article: &Article,
    attributes: &mut Value,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if let Some(category_id) = article.category_id
        && let Some(category) = state
            .content
            .find_category(category_id)
            .await
            .map_err(store_error)?
    {
        attributes["category"] = json!({
            "data": {
                "id": category.id,
                "attributes": { "name": category.name, "slug": category.slug },
            },
        });
    }

    if let Some(author_id) = article.author_id
        && let Some(author) = state
            .users
            .find_user_by_id(author_id)
            .await
            .map_err(store_error)?
    {
        attributes["author"] = json!({
            "data": {
                "id": author.id,
                "attributes": {
                    "username": author.username,
                    "email": author.email,
                    "full_name": author.full_name,
                },
            },
        });
    }

    Ok(())
}

/// List articles (`GET /api/articles`).
///
/// Filters on slug, category slug, and featured flag; sorts by
/// `views:desc`/`views:asc` or newest-first; paginates with
/// `pagination_limit`/`pagination_start`. Any `populate` value attaches
/// the category and author relations.
///
/// # Response
///
/// ```json
/// { "data": [ { "id": "…", "attributes": { "title": "…", "views": 3, … } } ] }
/// ```
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ArticleListParams>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    // A category slug that matches nothing leaves the filter unset and
    // the listing falls back to every article.
    let mut category_id = None;
    if let Some(category_slug) = &params.filters_category_slug {
        category_id = state
            .content
            .find_category_by_slug(category_slug)
            .await
            .map_err(store_error)?
            .map(|category| category.id);
    }

    let query = ArticleQuery {
        slug: params.filters_slug.clone(),
        category_id,
        is_featured: params.filters_is_featured,
        sort: ArticleSort::from_param(params.sort.as_deref()),
        limit: params.pagination_limit,
        offset: params.pagination_start,
    };

    let articles = state.content.list_articles(&query).await.map_err(store_error)?;

    let mut data = Vec::with_capacity(articles.len());
    for article in &articles {
        let mut attributes = article_attributes(article);
        if params.populate.is_some() {
            populate_relations(&state, article, &mut attributes).await?;
        }
        data.push(json!({ "id": article.id, "attributes": attributes }));
    }

    Ok(Json(json!({ "data": data })))
}

/// Fetch one article by id (`GET /api/articles/{id}`).
///
/// Every fetch increments the article's view counter.
///
/// # Errors
///
/// - `404 Not Found`: no article with that id
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ArticleGetParams>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let Some(mut article) = state.content.find_article(id).await.map_err(store_error)? else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Article not found".to_string(),
            }),
        ));
    };

    if let Some(views) = state.content.increment_views(id).await.map_err(store_error)? {
        article.views = views;
    }

    let mut attributes = article_attributes(&article);
    if params.populate.is_some() {
        populate_relations(&state, &article, &mut attributes).await?;
    }

    Ok(Json(json!({
        "data": { "id": article.id, "attributes": attributes },
    })))
}

/// Create an article (`POST /api/articles`, bearer token required).
///
/// The authenticated user becomes the author: `author_id` is taken from
/// the verified token claims, never from the payload.
pub async fn create_article(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessTokenClaims>,
    Json(payload): Json<CreateArticlePayload>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let now = Utc::now();
    let article = Article {
        id: Uuid::new_v4(),
        title: payload.title,
        slug: payload.slug,
        excerpt: payload.excerpt,
        content: payload.content,
        featured_image: payload.featured_image,
        category_id: payload.category_id,
        author_id: Some(claims.user_id),
        views: 0,
        is_featured: payload.is_featured,
        published_at: Some(now),
        created_at: now,
        updated_at: now,
    };

    state
        .content
        .insert_article(article.clone())
        .await
        .map_err(store_error)?;

    metrics::articles_created_total();
    tracing::info!(article_id = %article.id, author_id = %claims.user_id, "article created");

    let mut attributes = article_attributes(&article);
    attributes["category_id"] = json!(article.category_id);
    attributes["author_id"] = json!(article.author_id);

    Ok(Json(json!({
        "data": { "id": article.id, "attributes": attributes },
    })))
}
