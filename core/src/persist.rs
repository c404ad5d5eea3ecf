use crate::{Book, Rating, SimilarityMatrix};
use anyhow::{bail, Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub struct LibraryPaths {
    pub root: PathBuf,
}

impl LibraryPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn books(&self) -> PathBuf { self.root.join("Books.csv") }
    fn ratings(&self) -> PathBuf { self.root.join("Ratings.csv") }
    fn similarity(&self) -> PathBuf { self.root.join("similarity.bin") }
}

pub fn load_books(paths: &LibraryPaths) -> Result<Vec<Book>> {
    let path = paths.books();
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("opening catalog {}", path.display()))?;
    let mut books = Vec::new();
    for record in reader.deserialize() {
        let book: Book = record.with_context(|| format!("reading {}", path.display()))?;
        books.push(book);
    }
    Ok(books)
}

pub fn save_books(paths: &LibraryPaths, books: &[Book]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut writer = csv::Writer::from_path(paths.books())?;
    for book in books {
        writer.serialize(book)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_ratings(paths: &LibraryPaths) -> Result<Vec<Rating>> {
    let path = paths.ratings();
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("opening ratings {}", path.display()))?;
    let mut ratings = Vec::new();
    for record in reader.deserialize() {
        let rating: Rating = record.with_context(|| format!("reading {}", path.display()))?;
        ratings.push(rating);
    }
    Ok(ratings)
}

pub fn save_ratings(paths: &LibraryPaths, ratings: &[Rating]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut writer = csv::Writer::from_path(paths.ratings())?;
    for rating in ratings {
        writer.serialize(rating)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_similarity(paths: &LibraryPaths, matrix: &SimilarityMatrix) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.similarity())?;
    let bytes = bincode::serialize(matrix)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_similarity(paths: &LibraryPaths) -> Result<SimilarityMatrix> {
    let path = paths.similarity();
    let mut f = File::open(&path)
        .with_context(|| format!("opening similarity matrix {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let matrix: SimilarityMatrix = bincode::deserialize(&buf)
        .with_context(|| format!("decoding {}", path.display()))?;
    if matrix.rows.len() != matrix.titles.len()
        || matrix.rows.iter().any(|r| r.len() != matrix.titles.len())
    {
        bail!(
            "similarity matrix in {} is not square ({} titles)",
            path.display(),
            matrix.titles.len()
        );
    }
    Ok(matrix)
}
