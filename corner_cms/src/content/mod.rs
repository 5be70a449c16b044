//! Content models for the editorial API.
//!
//! Articles and categories are plain records; all query/sort/pagination
//! behavior is expressed through [`ArticleQuery`] and executed by the
//! store implementations in [`crate::db`].

pub mod models;

pub use models::{Article, ArticleQuery, ArticleSort, Category};
