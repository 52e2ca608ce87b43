//! Book record and ISBN candidate set.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Sentinel year for books whose publication year could not be resolved.
pub const UNKNOWN_YEAR: i32 = -2;

/// A book as reported by the bestseller source, enriched with a year.
///
/// Two books are the same book when title, publisher and year match. The
/// author is carried along but does not take part in equality, so records that
/// differ only by author collapse into one entry of a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Book title
    #[serde(rename = "name")]
    pub title: String,

    /// Publisher name
    pub publisher: String,

    /// Author as attributed by the bestseller source
    pub author: String,

    /// Publication year, or [`UNKNOWN_YEAR`]
    pub year: i32,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        publisher: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            publisher: publisher.into(),
            author: author.into(),
            year,
        }
    }

    /// Whether a publication year was resolved for this book.
    pub fn has_known_year(&self) -> bool {
        self.year != UNKNOWN_YEAR
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year && self.title == other.title && self.publisher == other.publisher
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.publisher.hash(state);
        self.year.hash(state);
    }
}

/// Candidate ISBN-13 identifiers gathered for one book.
///
/// Kept sorted so that the same identifiers always form the same cache key,
/// whatever order the upstream source listed them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IsbnSet(BTreeSet<String>);

impl IsbnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier. Blank values are ignored.
    pub fn insert(&mut self, isbn: impl AsRef<str>) -> bool {
        let isbn = isbn.as_ref().trim();
        if isbn.is_empty() {
            return false;
        }
        self.0.insert(isbn.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IsbnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for isbn in iter {
            set.insert(isbn);
        }
        set
    }
}

impl<S: AsRef<str>> Extend<S> for IsbnSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for isbn in iter {
            self.insert(isbn);
        }
    }
}

impl fmt::Display for IsbnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, isbn) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{isbn}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identity_ignores_author() {
        let mut books = HashSet::new();
        books.insert(Book::new("Outlander", "Delacorte", "Diana Gabaldon", 1991));
        books.insert(Book::new("Outlander", "Delacorte", "D. Gabaldon", 1991));
        assert_eq!(books.len(), 1);
    }

    #[test]
    fn identity_uses_year() {
        let mut books = HashSet::new();
        books.insert(Book::new("Outlander", "Delacorte", "Diana Gabaldon", 1991));
        books.insert(Book::new("Outlander", "Delacorte", "Diana Gabaldon", UNKNOWN_YEAR));
        assert_eq!(books.len(), 2);
    }

    #[test]
    fn known_year() {
        assert!(Book::new("Outlander", "Delacorte", "Diana Gabaldon", 1991).has_known_year());
        assert!(!Book::new("Outlander", "Delacorte", "Diana Gabaldon", UNKNOWN_YEAR).has_known_year());
    }

    #[test]
    fn isbn_set_is_order_independent() {
        let a: IsbnSet = ["9780440212560", "9780385319959"].into_iter().collect();
        let b: IsbnSet = ["9780385319959", "9780440212560"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "[9780385319959, 9780440212560]");
    }

    #[test]
    fn isbn_set_skips_blank_values() {
        let set: IsbnSet = ["", "  ", "9780440212560"].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn book_serializes_title_as_name() {
        let json = serde_json::to_value(Book::new("Voyager", "Delacorte", "Diana Gabaldon", 1994))
            .unwrap();
        assert_eq!(json["name"], "Voyager");
        assert_eq!(json["year"], 1994);
    }
}
