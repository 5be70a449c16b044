//! Article and category records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Published (or draft) article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub views: i64,
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sort order for article listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSort {
    /// Newest first (default).
    #[default]
    Newest,
    ViewsDesc,
    ViewsAsc,
}

impl ArticleSort {
    /// Parse the API's `sort` query parameter. Unknown values fall back
    /// to newest-first.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("views:desc") => ArticleSort::ViewsDesc,
            Some("views:asc") => ArticleSort::ViewsAsc,
            _ => ArticleSort::Newest,
        }
    }
}

/// Filter, sort, and pagination for an article listing.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    pub slug: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    pub sort: ArticleSort,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            slug: None,
            category_id: None,
            is_featured: None,
            sort: ArticleSort::Newest,
            limit: 25,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_param_parsing() {
        assert_eq!(ArticleSort::from_param(None), ArticleSort::Newest);
        assert_eq!(ArticleSort::from_param(Some("views:desc")), ArticleSort::ViewsDesc);
        assert_eq!(ArticleSort::from_param(Some("views:asc")), ArticleSort::ViewsAsc);
        assert_eq!(ArticleSort::from_param(Some("title:asc")), ArticleSort::Newest);
    }
}
