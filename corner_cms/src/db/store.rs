//! Store trait definitions and their PostgreSQL implementations.
//!
//! The traits keep the auth core and the HTTP handlers independent of the
//! backing document store: production wires in the Postgres
//! implementations below, tests wire in [`crate::db::MemoryStore`].

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder, Row, postgres::PgRow};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::models::{UserRecord, UserRole};
use crate::content::{Article, ArticleQuery, ArticleSort, Category};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend unavailable or misbehaving
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store operations used by the auth core.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email (exact, case-sensitive match).
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Find a user by ID.
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    /// Persist a new user record.
    async fn insert_user(&self, user: UserRecord) -> StoreResult<()>;
}

/// Article and category operations used by the content handlers.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_articles(&self, query: &ArticleQuery) -> StoreResult<Vec<Article>>;

    async fn find_article(&self, id: Uuid) -> StoreResult<Option<Article>>;

    async fn insert_article(&self, article: Article) -> StoreResult<()>;

    /// Bump the view counter; returns the new count, or `None` when the
    /// article does not exist.
    async fn increment_views(&self, id: Uuid) -> StoreResult<Option<i64>>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;

    async fn insert_category(&self, category: Category) -> StoreResult<()>;
}

/// PostgreSQL implementation of [`UserStore`]
pub struct PgUserStore {
    pool: Arc<PgPool>,
}

impl PgUserStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        role: UserRole::from_str_or_editor(row.get::<&str, _>("role")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, full_name, role, created_at, updated_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert_user(&self, user: UserRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, full_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

/// PostgreSQL implementation of [`ContentStore`]
pub struct PgContentStore {
    pool: Arc<PgPool>,
}

impl PgContentStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn article_from_row(row: &PgRow) -> Article {
    Article {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        featured_image: row.get("featured_image"),
        category_id: row.get("category_id"),
        author_id: row.get("author_id"),
        views: row.get("views"),
        is_featured: row.get("is_featured"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const ARTICLE_COLUMNS: &str = "id, title, slug, excerpt, content, featured_image, category_id, \
     author_id, views, is_featured, published_at, created_at, updated_at";

#[async_trait]
impl ContentStore for PgContentStore {
    async fn list_articles(&self, query: &ArticleQuery) -> StoreResult<Vec<Article>> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE TRUE"));

        if let Some(slug) = &query.slug {
            builder.push(" AND slug = ").push_bind(slug);
        }
        if let Some(category_id) = query.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(is_featured) = query.is_featured {
            builder.push(" AND is_featured = ").push_bind(is_featured);
        }

        builder.push(match query.sort {
            ArticleSort::Newest => " ORDER BY created_at DESC",
            ArticleSort::ViewsDesc => " ORDER BY views DESC",
            ArticleSort::ViewsAsc => " ORDER BY views ASC",
        });

        builder.push(" LIMIT ").push_bind(query.limit);
        builder.push(" OFFSET ").push_bind(query.offset);

        let rows = builder.build().fetch_all(self.pool.as_ref()).await?;
        Ok(rows.iter().map(article_from_row).collect())
    }

    async fn find_article(&self, id: Uuid) -> StoreResult<Option<Article>> {
        let row = sqlx::query(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.as_ref().map(article_from_row))
    }

    async fn insert_article(&self, article: Article) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (id, title, slug, excerpt, content, featured_image, category_id,
                                  author_id, views, is_featured, published_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.featured_image)
        .bind(article.category_id)
        .bind(article.author_id)
        .bind(article.views)
        .bind(article.is_featured)
        .bind(article.published_at)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> StoreResult<Option<i64>> {
        let row = sqlx::query("UPDATE articles SET views = views + 1 WHERE id = $1 RETURNING views")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| r.get("views")))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, slug, created_at, updated_at FROM categories ORDER BY created_at",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let row =
            sqlx::query("SELECT id, name, slug, created_at, updated_at FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, slug, created_at, updated_at FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn insert_category(&self, category: Category) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
