//! In-memory store used by tests and for running the server without a
//! database.
//!
//! Implements both [`UserStore`] and [`ContentStore`] over tokio-locked
//! hash maps. Not meant for multi-process deployments: contents vanish
//! with the process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{ContentStore, StoreResult, UserStore};
use crate::auth::models::UserRecord;
use crate::content::{Article, ArticleQuery, ArticleSort, Category};

/// Volatile store holding users, articles, and categories.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    articles: RwLock<HashMap<Uuid, Article>>,
    categories: RwLock<HashMap<Uuid, Category>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_user(&self, user: UserRecord) -> StoreResult<()> {
        self.users.write().await.insert(user.id, user);
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_articles(&self, query: &ArticleQuery) -> StoreResult<Vec<Article>> {
        let articles = self.articles.read().await;

        let mut matches: Vec<Article> = articles
            .values()
            .filter(|article| {
                query.slug.as_ref().is_none_or(|slug| &article.slug == slug)
                    && query
                        .category_id
                        .is_none_or(|id| article.category_id == Some(id))
                    && query
                        .is_featured
                        .is_none_or(|featured| article.is_featured == featured)
            })
            .cloned()
            .collect();

        match query.sort {
            ArticleSort::Newest => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ArticleSort::ViewsDesc => matches.sort_by(|a, b| b.views.cmp(&a.views)),
            ArticleSort::ViewsAsc => matches.sort_by(|a, b| a.views.cmp(&b.views)),
        }

        let start = query.offset.max(0) as usize;
        let limit = query.limit.max(0) as usize;
        Ok(matches.into_iter().skip(start).take(limit).collect())
    }

    async fn find_article(&self, id: Uuid) -> StoreResult<Option<Article>> {
        Ok(self.articles.read().await.get(&id).cloned())
    }

    async fn insert_article(&self, article: Article) -> StoreResult<()> {
        self.articles.write().await.insert(article.id, article);
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> StoreResult<Option<i64>> {
        let mut articles = self.articles.write().await;
        Ok(articles.get_mut(&id).map(|article| {
            article.views += 1;
            article.views
        }))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut all: Vec<Category> = categories.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|category| category.slug == slug).cloned())
    }

    async fn insert_category(&self, category: Category) -> StoreResult<()> {
        self.categories.write().await.insert(category.id, category);
        Ok(())
    }
}
