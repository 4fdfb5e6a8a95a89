//! Trait definition for pluggable page sources.
//!
//! The search client only knows how to ask for "the page after this
//! cursor". [`PageSource`] is that seam: the GitHub GraphQL backend
//! implements it over HTTP, and tests implement it with scripted pages.

use crate::error::SearchError;
use crate::types::SearchPage;

/// A backend that can serve one page of user search results.
///
/// Implementors handle their own:
///
/// - request construction and authentication
/// - transport and status errors
/// - decoding the response into a [`SearchPage`]
///
/// Every error returned is treated as a transient page failure by the
/// search client and retried with backoff.
pub trait PageSource: Send + Sync {
    /// Fetch one page.
    ///
    /// # Arguments
    ///
    /// * `query`: The full search query string.
    /// * `cursor`: Continuation token from the previous page, `None` for the first.
    /// * `page_size`: Maximum number of results to return.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails or the response cannot
    /// be decoded.
    fn fetch_page(
        &self,
        query: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<SearchPage, SearchError>> + Send;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}
