use crate::catalog::{Book, BookSummary, Rating, SimilarityMatrix};
use crate::persist::{load_books, load_ratings, load_similarity, LibraryPaths};
use anyhow::Result;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("book '{0}' not found")]
    UnknownTitle(String),
}

/// The in-memory data context: catalog, ratings and similarity matrix,
/// loaded once at startup and read-only afterwards. Safe to share across
/// request handlers without locking.
pub struct Library {
    books: Vec<Book>,
    ratings: Vec<Rating>,
    similarity: SimilarityMatrix,
    /// isbn -> index of its catalog record
    by_isbn: HashMap<String, usize>,
    /// title -> index of the first catalog record bearing it; duplicate
    /// titles collapse to the first record
    by_title: HashMap<String, usize>,
}

impl Library {
    pub fn new(books: Vec<Book>, ratings: Vec<Rating>, similarity: SimilarityMatrix) -> Self {
        let mut by_isbn = HashMap::new();
        let mut by_title = HashMap::new();
        for (i, book) in books.iter().enumerate() {
            by_isbn.entry(book.isbn.clone()).or_insert(i);
            by_title.entry(book.title.clone()).or_insert(i);
        }
        Self { books, ratings, similarity, by_isbn, by_title }
    }

    /// Load all three artifacts from `paths`. Any failure is fatal to the
    /// caller; the service cannot run without its backing tables.
    pub fn load(paths: &LibraryPaths) -> Result<Self> {
        let books = load_books(paths)?;
        let ratings = load_ratings(paths)?;
        let similarity = load_similarity(paths)?;
        tracing::info!(
            num_books = books.len(),
            num_ratings = ratings.len(),
            num_titles = similarity.titles.len(),
            "library loaded"
        );
        Ok(Self::new(books, ratings, similarity))
    }

    pub fn num_books(&self) -> usize { self.books.len() }
    pub fn num_ratings(&self) -> usize { self.ratings.len() }
    pub fn num_titles(&self) -> usize { self.similarity.titles.len() }

    /// Books ranked by rating-event count, most rated first. Ties keep the
    /// order isbns first appear in the ratings table; the top `limit` isbns
    /// are resolved to catalog records and duplicate titles collapsed,
    /// first occurrence retained.
    pub fn top_rated(&self, limit: usize) -> Vec<BookSummary> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let mut ranked: Vec<&str> = Vec::new();
        for r in &self.ratings {
            let count = counts.entry(r.isbn.as_str()).or_insert(0);
            if *count == 0 {
                ranked.push(r.isbn.as_str());
            }
            *count += 1;
        }
        // stable sort keeps first-seen order between equal counts
        ranked.sort_by_key(|isbn| Reverse(counts[isbn]));
        ranked.truncate(limit);

        let mut seen_titles: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for isbn in ranked {
            let Some(&i) = self.by_isbn.get(isbn) else { continue };
            let book = &self.books[i];
            if seen_titles.insert(book.title.as_str()) {
                out.push(book.summary());
            }
        }
        out
    }

    /// The `count` titles most similar to `title`, resolved to catalog
    /// records in descending-score order. The entry for `title` itself is
    /// filtered out wherever it ranks; ties keep matrix column order.
    pub fn recommend(&self, title: &str, count: usize) -> Result<Vec<BookSummary>, QueryError> {
        let Some(row) = self.similarity.row(title) else {
            return Err(QueryError::UnknownTitle(title.to_string()));
        };
        let mut scored: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| self.similarity.titles[i] != title)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(count);

        let mut out = Vec::new();
        for (i, _score) in scored {
            let similar = self.similarity.titles[i].as_str();
            if let Some(&idx) = self.by_title.get(similar) {
                out.push(self.books[idx].summary());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.into(),
            title: title.into(),
            author: "A. Author".into(),
            image_url: format!("http://img/{isbn}.jpg"),
        }
    }

    #[test]
    fn recommend_skips_self_even_when_not_top_ranked() {
        // self-similarity deliberately not the highest score in the row
        let matrix = SimilarityMatrix::new(
            vec!["X".into(), "Y".into()],
            vec![vec![0.5, 0.9], vec![0.9, 0.5]],
        );
        let library = Library::new(vec![book("1", "X"), book("2", "Y")], vec![], matrix);
        let recs = library.recommend("X", 5).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Y");
    }
}
