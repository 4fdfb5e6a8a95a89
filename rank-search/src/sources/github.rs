//! GitHub GraphQL search backend.
//!
//! POSTs the user search query to the GraphQL endpoint with a bearer
//! token and decodes the `search` connection into a [`SearchPage`].

use serde::Deserialize;
use serde_json::json;

use crate::config::HarvestConfig;
use crate::error::SearchError;
use crate::http;
use crate::source::PageSource;
use crate::types::{SearchPage, UserNode};

/// GraphQL document for one page of user search results.
pub const SEARCH_QUERY: &str = r#"
query($searchQuery: String!, $cursor: String, $first: Int!) {
  search(type: USER, query: $searchQuery, first: $first, after: $cursor) {
    userCount
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      node {
        ... on User {
          login
          name
          avatarUrl
          followers {
            totalCount
          }
          contributionsCollection {
            contributionCalendar {
              totalContributions
            }
            totalCommitContributions
            restrictedContributionsCount
          }
          organizations(first: 10) {
            nodes {
              login
            }
          }
        }
      }
    }
  }
}
"#;

/// Page source backed by GitHub's GraphQL API.
pub struct GitHubGraphQl {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubGraphQl {
    /// Create a source for `config.api_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the token is blank, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &HarvestConfig, token: impl Into<String>) -> Result<Self, SearchError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SearchError::Config("API token must not be empty".into()));
        }
        Ok(Self {
            client: http::build_client(config)?,
            api_url: config.api_url.clone(),
            token,
        })
    }
}

impl PageSource for GitHubGraphQl {
    async fn fetch_page(
        &self,
        query: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<SearchPage, SearchError> {
        tracing::trace!(query, ?cursor, page_size, "GitHub search page");

        let body = json!({
            "query": SEARCH_QUERY,
            "variables": {
                "searchQuery": query,
                "cursor": cursor,
                "first": page_size,
            },
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("GitHub request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("GitHub HTTP error: {e}")))?;

        let text = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("GitHub response read failed: {e}")))?;

        tracing::trace!(bytes = text.len(), "GitHub response received");

        parse_search_response(&text)
    }

    fn name(&self) -> &'static str {
        "github-graphql"
    }
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct SearchData {
    search: Option<SearchConnection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchConnection {
    #[serde(default)]
    user_count: u64,
    page_info: PageInfo,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct Edge {
    node: Option<serde_json::Value>,
}

/// Decode one edge node. Organizations also match user searches and
/// `... on User` leaves them as `{}`, so a node without `login` is skipped.
/// A node with `login` that does not decode fails the whole page.
fn decode_node(node: serde_json::Value) -> Result<Option<UserNode>, SearchError> {
    let login = match node.get("login").and_then(serde_json::Value::as_str) {
        Some(login) => login.to_owned(),
        None => return Ok(None),
    };
    serde_json::from_value(node)
        .map(Some)
        .map_err(|e| SearchError::Parse(format!("malformed user node `{login}`: {e}")))
}

/// Decode a GraphQL search response body.
///
/// Extracted as a separate function for testability with canned bodies.
pub(crate) fn parse_search_response(body: &str) -> Result<SearchPage, SearchError> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid GraphQL response: {e}")))?;

    let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();

    let search = match response.data.and_then(|d| d.search) {
        Some(search) => search,
        None if !messages.is_empty() => return Err(SearchError::Api(messages.join("; "))),
        None => {
            return Err(SearchError::Parse(
                "GraphQL response has no search data".into(),
            ))
        }
    };

    if !messages.is_empty() {
        tracing::warn!(errors = %messages.join("; "), "GitHub returned partial data");
    }

    let mut nodes = Vec::with_capacity(search.edges.len());
    for node in search.edges.into_iter().filter_map(|edge| edge.node) {
        if let Some(user) = decode_node(node)? {
            nodes.push(user);
        }
    }

    Ok(SearchPage {
        total_count: search.user_count,
        has_next_page: search.page_info.has_next_page,
        end_cursor: search.page_info.end_cursor,
        nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
      "data": {
        "search": {
          "userCount": 2,
          "pageInfo": {"hasNextPage": true, "endCursor": "Y3Vyc29yOjI="},
          "edges": [
            {"node": {
              "login": "ram",
              "name": "Ram",
              "avatarUrl": "https://avatars.example/ram",
              "followers": {"totalCount": 10},
              "contributionsCollection": {
                "contributionCalendar": {"totalContributions": 50},
                "totalCommitContributions": 30,
                "restrictedContributionsCount": 5
              },
              "organizations": {"nodes": []}
            }},
            {"node": {}}
          ]
        }
      }
    }"#;

    #[test]
    fn parses_page_and_skips_non_user_nodes() {
        let page = parse_search_response(PAGE).expect("parse");
        assert_eq!(page.total_count, 2);
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("Y3Vyc29yOjI="));
        assert_eq!(page.nodes.len(), 1);
        assert_eq!(page.nodes[0].login, "ram");
    }

    #[test]
    fn malformed_user_node_fails_page() {
        let body = r#"{
          "data": {"search": {"userCount": 1,
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "edges": [{"node": {
              "login": "ram",
              "name": null,
              "avatarUrl": "https://avatars.example/ram",
              "followers": {"totalCount": 1},
              "contributionsCollection": null,
              "organizations": {"nodes": []}
            }}]}}
        }"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
        assert!(err.to_string().contains("ram"));
    }

    #[test]
    fn null_nodes_are_skipped() {
        let body = r#"{
          "data": {"search": {"userCount": 0,
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "edges": [{"node": null}]}}
        }"#;
        let page = parse_search_response(body).expect("parse");
        assert!(page.nodes.is_empty());
    }

    #[test]
    fn errors_without_data_are_api_errors() {
        let body = r#"{"data": null, "errors": [{"message": "API rate limit exceeded"}]}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, SearchError::Api(_)));
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn partial_data_with_errors_is_accepted() {
        let body = r#"{
          "data": {"search": {"userCount": 0,
            "pageInfo": {"hasNextPage": false, "endCursor": null},
            "edges": []}},
          "errors": [{"message": "something partial"}]
        }"#;
        let page = parse_search_response(body).expect("parse");
        assert!(!page.has_next_page);
        assert!(page.nodes.is_empty());
    }

    #[test]
    fn garbage_body_is_parse_error() {
        let err = parse_search_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn missing_search_is_parse_error() {
        let err = parse_search_response(r#"{"data": {"search": null}}"#).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn blank_token_rejected() {
        let result = GitHubGraphQl::new(&HarvestConfig::default(), "  ");
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GitHubGraphQl>();
    }
}
