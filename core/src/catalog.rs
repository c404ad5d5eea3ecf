use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog row from Books.csv. `isbn` is the primary key; titles are not
/// guaranteed unique across records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Image-URL-M")]
    pub image_url: String,
}

impl Book {
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            title: self.title.clone(),
            author: self.author.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// One rating event from Ratings.csv. `isbn` refers into the catalog but is
/// not enforced as a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "User-ID")]
    pub user_id: u32,
    #[serde(rename = "Book-Rating")]
    pub rating: u8,
}

/// The (title, author, image) tuple both queries return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub image_url: String,
}

/// Square title-by-title similarity scores, precomputed offline and loaded
/// as an opaque artifact. Row and column order both follow `titles`; the
/// diagonal holds self-similarity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    pub titles: Vec<String>,
    pub by_title: HashMap<String, usize>,
    pub rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    pub fn new(titles: Vec<String>, rows: Vec<Vec<f32>>) -> Self {
        let by_title = titles
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { titles, by_title, rows }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.by_title.contains_key(title)
    }

    /// Score row for `title`, in column order.
    pub fn row(&self, title: &str) -> Option<&[f32]> {
        self.by_title.get(title).map(|&i| self.rows[i].as_slice())
    }
}
