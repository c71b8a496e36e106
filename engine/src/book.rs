//! Book entity for the catalog.

use crate::Isbn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a catalogued book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookStatus::Available => write!(f, "available"),
            BookStatus::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// A book in the catalog.
///
/// The ISBN is the catalog key and is treated as opaque here; syntax checks
/// belong to the input layer. Status is Borrowed exactly while one open
/// transaction references this ISBN, so only the lending path may change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Catalog identifier
    pub isbn: Isbn,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Year of publication
    pub publication_year: i32,
    /// Lifecycle status
    status: BookStatus,
    /// Date the book entered the catalog
    pub added_on: NaiveDate,
}

impl Book {
    /// Register a new book. Books always enter the catalog as available.
    pub fn new(
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        added_on: NaiveDate,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            publication_year,
            status: BookStatus::Available,
            added_on,
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Check whether the book can be borrowed right now.
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub(crate) fn set_status(&mut self, status: BookStatus) {
        self.status = status;
    }
}
