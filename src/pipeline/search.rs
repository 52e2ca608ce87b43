// src/pipeline/search.rs

//! One-shot author search.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Book, SearchRequest};
use crate::services::SearchService;

/// Run a search and return the books ordered by year, then title.
pub async fn run_search(search: &SearchService, request: &SearchRequest) -> Result<Vec<Book>> {
    let start_time = Utc::now();
    log::info!(
        "Searching books by {} (years: {:?})",
        request.author.as_deref().unwrap_or_default(),
        request.years.as_deref().unwrap_or_default()
    );

    let mut books: Vec<Book> = search.search_request(request).await?.into_iter().collect();
    books.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.title.cmp(&b.title)));

    let elapsed = Utc::now() - start_time;
    let unknown = books.iter().filter(|book| !book.has_known_year()).count();
    log::info!(
        "Found {} books ({} without a publication year) in {} ms",
        books.len(),
        unknown,
        elapsed.num_milliseconds()
    );

    Ok(books)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Config;
    use crate::services::Services;
    use crate::utils::http::StubClient;
    use crate::utils::timing::RecordingSink;

    const PAGE: &str = "https://api.nytimes.com/svc/books/v3/lists/best-sellers/history.json?author=Stephen+King&offset=0&api-key=k";

    fn search(client: StubClient) -> SearchService {
        let mut config = Config::default();
        config.bestsellers.api_key = "k".to_string();
        Services::with_client(&config, Arc::new(client), Arc::new(RecordingSink::default()))
            .unwrap()
            .search
    }

    #[tokio::test]
    async fn results_are_ordered_by_year_then_title() {
        let client = StubClient::new()
            .respond(
                PAGE,
                r#"{"num_results": 3, "results": [
                    {"title": "MISERY", "publisher": "Viking", "author": "Stephen King", "isbns": [{"isbn13": "3"}]},
                    {"title": "CARRIE", "publisher": "Doubleday", "author": "Stephen King", "isbns": [{"isbn13": "1"}]},
                    {"title": "CUJO", "publisher": "Viking", "author": "Stephen King", "isbns": [{"isbn13": "1"}]}
                ]}"#,
            )
            .respond("https://openlibrary.org/isbn/1.json", r#"{"publish_date": "1974"}"#)
            .respond("https://openlibrary.org/isbn/3.json", r#"{"publish_date": "1987"}"#);

        let books = run_search(&search(client), &SearchRequest::new("Stephen King"))
            .await
            .unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["CARRIE", "CUJO", "MISERY"]);
    }

    #[tokio::test]
    async fn blank_author_fails() {
        let err = run_search(&search(StubClient::new()), &SearchRequest::new(" "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
