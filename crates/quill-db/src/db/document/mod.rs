mod article;

pub use article::{ArticleRecord, ArticleRepository};
