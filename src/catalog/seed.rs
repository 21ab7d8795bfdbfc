//! Initial store contents
//!
//! The store is seeded once at startup from one of three sources: the
//! built-in collection, nothing at all, or a TOML file of `[[books]]` tables.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::book::NewBook;
use super::error::CatalogError;
use super::store::BookStore;
use crate::config::{CatalogConfig, SeedPolicy};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid seed record: {0}")]
    Invalid(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    books: Vec<NewBook>,
}

/// The five records the catalog ships with
pub fn builtin_books() -> Vec<NewBook> {
    vec![
        NewBook::new(
            "Sahih al-Bukhari",
            "Imam Bukhari",
            "/images/sahih-bukhari.jpg",
            "https://d1.islamhouse.com/data/en/ih_books/single/en_Sahih_Al-Bukhari.pdf",
        ),
        NewBook::new(
            "Sahih Muslim",
            "Imam Muslim",
            "/images/sahih-muslim.jpg",
            "https://archive.org/details/sahih-muslim-english-vol-1/sahih-muslim-english-vol-1/",
        ),
        NewBook::new(
            "Tafseer Ibn Kathir",
            "Ibn Kathir",
            "/images/tafsir-ibn-kathir.jpg",
            "https://www.emaanlibrary.com/wp-content/uploads/2015/04/1.-Tafsir-Ibn-Kathir-all-10-volumes.pdf",
        ),
        NewBook::new(
            "Al-Muwatta",
            "Imam Malik",
            "/images/al-muwatta.jpg",
            "https://www.islamiclibrary.com/Viewer/Pdf.html?file=text-pdfs/EN4053.pdf",
        ),
        NewBook::new(
            "Riyad as-Salihin",
            "Imam Nawawi",
            "/images/riyad-as-salihin.jpg",
            "https://archive.org/details/riyad-as-salihin-english/page/n13/mode/2up",
        ),
    ]
}

/// Read seed records from a TOML file
pub fn load_seed_file(path: &Path) -> Result<Vec<NewBook>, SeedError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: display.clone(),
        source,
    })?;
    let file: SeedFile = toml::from_str(&content).map_err(|source| SeedError::Parse {
        path: display,
        source,
    })?;
    Ok(file.books)
}

/// Build the store according to the catalog configuration.
/// A configured seed file takes precedence over the seed policy.
pub fn build_store(config: &CatalogConfig) -> Result<BookStore, SeedError> {
    let seed = match (&config.seed_file, config.seed) {
        (Some(path), _) => load_seed_file(Path::new(path))?,
        (None, SeedPolicy::Builtin) => builtin_books(),
        (None, SeedPolicy::Empty) => Vec::new(),
    };
    Ok(BookStore::with_books(seed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn catalog_config(seed: SeedPolicy, seed_file: Option<String>) -> CatalogConfig {
        CatalogConfig {
            seed,
            seed_file,
            static_dir: "public".to_string(),
        }
    }

    #[tokio::test]
    async fn test_builtin_seed() {
        let store = build_store(&catalog_config(SeedPolicy::Builtin, None)).unwrap();
        let books = store.list().await;
        assert_eq!(books.len(), 5);
        assert_eq!(books[0].id, 1);
        assert_eq!(books[0].title, "Sahih al-Bukhari");
        assert_eq!(books[4].id, 5);
        assert_eq!(books[4].author, "Imam Nawawi");
        assert_eq!(books[2].image, "/images/tafsir-ibn-kathir.jpg");
    }

    #[tokio::test]
    async fn test_empty_seed() {
        let store = build_store(&catalog_config(SeedPolicy::Empty, None)).unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_seed_file_overrides_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[books]]
title = "Kitab at-Tawhid"
author = "Ibn Khuzaymah"
image = "/images/tawhid.jpg"
pdfLink = "https://example.com/tawhid.pdf"
"#
        )
        .unwrap();

        let path = file.path().display().to_string();
        let store = build_store(&catalog_config(SeedPolicy::Builtin, Some(path))).unwrap();
        let books = store.list().await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, 1);
        assert_eq!(books[0].pdf_link, "https://example.com/tawhid.pdf");
    }

    #[test]
    fn test_seed_file_with_incomplete_record() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[books]]\ntitle = \"No author\"").unwrap();

        let path = file.path().display().to_string();
        let result = build_store(&catalog_config(SeedPolicy::Empty, Some(path)));
        assert!(matches!(result, Err(SeedError::Invalid(_))));
    }

    #[test]
    fn test_missing_seed_file() {
        let result = load_seed_file(Path::new("/nonexistent/books.toml"));
        assert!(matches!(result, Err(SeedError::Io { .. })));
    }
}
