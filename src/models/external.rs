//! Response shapes of the upstream APIs.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! payloads is ignored during deserialization.

use serde::{Deserialize, Deserializer};

use super::IsbnSet;

/// One page of the bestseller history API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BestsellerResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub num_results: u32,

    #[serde(default)]
    pub results: Option<Vec<BestsellerEntry>>,
}

/// A single book entry of a bestseller page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BestsellerEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub publisher: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,

    #[serde(default)]
    pub isbns: Option<Vec<IsbnRecord>>,

    #[serde(default)]
    pub ranks_history: Option<Vec<RankHistory>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IsbnRecord {
    #[serde(default)]
    pub isbn13: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankHistory {
    #[serde(default)]
    pub primary_isbn13: Option<String>,
}

impl BestsellerEntry {
    /// Collect every ISBN-13 this entry mentions, from both sub-lists.
    pub fn isbn_candidates(&self) -> IsbnSet {
        let direct = self
            .isbns
            .iter()
            .flatten()
            .filter_map(|record| record.isbn13.as_deref());
        let ranked = self
            .ranks_history
            .iter()
            .flatten()
            .filter_map(|rank| rank.primary_isbn13.as_deref());

        direct.chain(ranked).collect()
    }
}

/// Treat an explicit JSON `null` the same as a missing string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Edition record of the ISBN lookup API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicationResponse {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub publish_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_collects_isbns_from_both_lists() {
        let json = r#"{
            "title": "OUTLANDER",
            "publisher": "Delacorte",
            "author": "Diana Gabaldon",
            "contributor": "by Diana Gabaldon",
            "isbns": [{"isbn10": "0440212561", "isbn13": "9780440212560"}, {"isbn10": "x"}],
            "ranks_history": [
                {"primary_isbn13": "9780440212560", "rank": 3},
                {"primary_isbn13": "9780385319959", "rank": 9}
            ]
        }"#;

        let entry: BestsellerEntry = serde_json::from_str(json).unwrap();
        let isbns = entry.isbn_candidates();
        assert_eq!(isbns.len(), 2);
        assert_eq!(
            isbns.iter().collect::<Vec<_>>(),
            vec!["9780385319959", "9780440212560"]
        );
    }

    #[test]
    fn entry_without_isbn_lists_has_no_candidates() {
        let entry: BestsellerEntry =
            serde_json::from_str(r#"{"title": "A", "publisher": "B", "author": "C"}"#).unwrap();
        assert!(entry.isbn_candidates().is_empty());
    }

    #[test]
    fn null_strings_become_empty() {
        let entry: BestsellerEntry =
            serde_json::from_str(r#"{"title": "A", "publisher": null, "author": "C"}"#).unwrap();
        assert_eq!(entry.publisher, "");
    }

    #[test]
    fn bestseller_response_tolerates_missing_results() {
        let response: BestsellerResponse =
            serde_json::from_str(r#"{"status": "OK", "num_results": 0}"#).unwrap();
        assert_eq!(response.num_results, 0);
        assert!(response.results.is_none());
    }
}
