//! Catalog - the book store and its policy layer.
//!
//! The store is a plain keyed map; the service in front of it owns the
//! catalog rules: ISBN uniqueness, no removal while borrowed, and the
//! status setter the lending path drives.

use crate::{error::Result, Book, BookStatus, Error, Isbn};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keyed collection of books.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStore {
    books: HashMap<Isbn, Book>,
}

impl BookStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
        }
    }

    /// Get a book by ISBN.
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub(crate) fn get_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub(crate) fn insert(&mut self, book: Book) {
        self.books.insert(book.isbn.clone(), book);
    }

    pub(crate) fn remove(&mut self, isbn: &str) -> Option<Book> {
        self.books.remove(isbn)
    }

    pub(crate) fn clear(&mut self) {
        self.books.clear();
    }

    /// Check whether an ISBN is registered.
    pub fn contains(&self, isbn: &str) -> bool {
        self.books.contains_key(isbn)
    }

    /// Iterate over all books in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Number of registered books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Catalog operations and rules over the book store.
#[derive(Debug, Clone, Default)]
pub struct CatalogService {
    store: BookStore,
}

impl CatalogService {
    /// Create a catalog over an empty store.
    pub fn new() -> Self {
        Self {
            store: BookStore::new(),
        }
    }

    /// Register a new book. The ISBN must not already be in the catalog.
    /// Returns a snapshot of the new record.
    pub fn add_book(
        &mut self,
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        added_on: NaiveDate,
    ) -> Result<Book> {
        let isbn = isbn.into();
        if self.store.contains(&isbn) {
            return Err(Error::BookAlreadyExists(isbn));
        }

        let book = Book::new(isbn, title, author, publication_year, added_on);
        self.store.insert(book.clone());

        Ok(book)
    }

    /// Remove a book from the catalog. Borrowed books cannot be removed.
    pub fn remove_book(&mut self, isbn: &str) -> Result<Book> {
        let book = self
            .store
            .get(isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.to_owned()))?;

        if book.status() == BookStatus::Borrowed {
            return Err(Error::BookCheckedOut(isbn.to_owned()));
        }

        self.store
            .remove(isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.to_owned()))
    }

    /// Look up a book by ISBN.
    pub fn book(&self, isbn: &str) -> Result<&Book> {
        self.store
            .get(isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.to_owned()))
    }

    /// Check whether an ISBN is registered.
    pub fn exists(&self, isbn: &str) -> bool {
        self.store.contains(isbn)
    }

    /// Whether the book exists and is available. Unknown ISBNs are simply
    /// not available.
    pub fn is_available(&self, isbn: &str) -> bool {
        self.store.get(isbn).is_some_and(Book::is_available)
    }

    /// Set a book's status. Only existence is checked here; the lending
    /// engine is responsible for only requesting legal transitions.
    pub(crate) fn set_status(&mut self, isbn: &str, status: BookStatus) -> Result<()> {
        let book = self
            .store
            .get_mut(isbn)
            .ok_or_else(|| Error::BookNotFound(isbn.to_owned()))?;
        book.set_status(status);
        Ok(())
    }

    /// Books whose title contains the term, case-insensitive.
    /// An empty term matches nothing.
    pub fn books_by_title(&self, title: &str) -> Vec<&Book> {
        let term = title.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.sorted(self.store.iter().filter(|b| b.title.to_lowercase().contains(&term)))
    }

    /// Books whose author contains the term, case-insensitive.
    /// An empty term matches nothing.
    pub fn books_by_author(&self, author: &str) -> Vec<&Book> {
        let term = author.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.sorted(
            self.store
                .iter()
                .filter(|b| b.author.to_lowercase().contains(&term)),
        )
    }

    /// Books in the given lifecycle status.
    pub fn books_by_status(&self, status: BookStatus) -> Vec<&Book> {
        self.sorted(self.store.iter().filter(|b| b.status() == status))
    }

    /// Keyword search over title, author, and ISBN, case-insensitive.
    /// An empty keyword matches the whole catalog.
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        let term = keyword.trim().to_lowercase();
        if term.is_empty() {
            return self.all_books();
        }
        self.sorted(self.store.iter().filter(|b| {
            b.title.to_lowercase().contains(&term)
                || b.author.to_lowercase().contains(&term)
                || b.isbn.to_lowercase().contains(&term)
        }))
    }

    /// Every book in the catalog, ordered by ISBN.
    pub fn all_books(&self) -> Vec<&Book> {
        self.sorted(self.store.iter())
    }

    /// Total number of books.
    pub fn book_count(&self) -> usize {
        self.store.len()
    }

    /// Number of books currently available.
    pub fn available_count(&self) -> usize {
        self.store.iter().filter(|b| b.is_available()).count()
    }

    pub(crate) fn store(&self) -> &BookStore {
        &self.store
    }

    pub(crate) fn restore(&mut self, book: Book) {
        self.store.insert(book);
    }

    pub(crate) fn clear(&mut self) {
        self.store.clear();
    }

    fn sorted<'a>(&self, books: impl Iterator<Item = &'a Book>) -> Vec<&'a Book> {
        let mut books: Vec<&Book> = books.collect();
        books.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        books
    }
}
