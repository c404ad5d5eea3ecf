pub mod catalog;
pub mod library;
pub mod persist;

pub use catalog::{Book, BookSummary, Rating, SimilarityMatrix};
pub use library::{Library, QueryError};
