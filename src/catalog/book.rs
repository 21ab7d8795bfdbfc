//! Book record and the request shapes that create or patch it.

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Store-assigned identifier, never reused
pub type BookId = u64;

/// A catalog entry as stored and as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// URL or path of the cover art
    pub image: String,
    /// URL of the downloadable document
    pub pdf_link: String,
}

/// Creation payload. Every field is optional at the type level so that a
/// missing field is reported as a validation error, not a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub pdf_link: Option<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        image: impl Into<String>,
        pdf_link: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            image: Some(image.into()),
            pdf_link: Some(pdf_link.into()),
        }
    }

    /// Names of required fields that are absent or empty, in wire order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("image", &self.image),
            ("pdfLink", &self.pdf_link),
        ]
        .into_iter()
        .filter(|(_, value)| !is_present(value.as_deref()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Turn the payload into a stored record with the given id
    pub(crate) fn into_book(self, id: BookId) -> Result<Book, CatalogError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CatalogError::Validation { missing });
        }

        Ok(Book {
            id,
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            pdf_link: self.pdf_link.unwrap_or_default(),
        })
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Partial update. Fields left out of the request (or sent as `null`) keep
/// their stored value; an `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub pdf_link: Option<String>,
}

impl BookPatch {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.image.is_none()
            && self.pdf_link.is_none()
    }

    pub(crate) fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(image) = self.image {
            book.image = image;
        }
        if let Some(pdf_link) = self.pdf_link {
            book.pdf_link = pdf_link;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book {
            id: 7,
            title: "A".to_string(),
            author: "B".to_string(),
            image: "i".to_string(),
            pdf_link: "p".to_string(),
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "title": "A", "author": "B", "image": "i", "pdfLink": "p"})
        );
    }

    #[test]
    fn test_missing_fields_reports_absent_and_empty() {
        let payload: NewBook =
            serde_json::from_str(r#"{"title":"A","author":"   ","pdfLink":""}"#).unwrap();
        assert_eq!(payload.missing_fields(), vec!["image", "pdfLink"]);
    }

    #[test]
    fn test_non_string_field_fails_to_decode() {
        let result = serde_json::from_str::<NewBook>(
            r#"{"title":123,"author":"B","image":"i","pdfLink":"p"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_into_book_rejects_incomplete_payload() {
        let payload = NewBook {
            image: None,
            ..NewBook::new("A", "B", "i", "p")
        };
        assert_eq!(
            payload.into_book(1),
            Err(CatalogError::Validation {
                missing: vec!["image"]
            })
        );
    }

    #[test]
    fn test_patch_ignores_id_and_nulls() {
        let patch: BookPatch =
            serde_json::from_str(r#"{"id":99,"title":"New","author":null}"#).unwrap();
        let mut book = NewBook::new("Old", "Author", "i", "p").into_book(3).unwrap();
        patch.apply(&mut book);
        assert_eq!(book.id, 3);
        assert_eq!(book.title, "New");
        assert_eq!(book.author, "Author");
    }

    #[test]
    fn test_empty_patch() {
        let patch: BookPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}
