//! Core types: search criteria, decoded API pages and account records.

use serde::{Deserialize, Serialize};

/// What to search for: OR-combined locations plus optional filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    /// Location filters, OR-combined.
    pub locations: Vec<String>,
    /// Locations to exclude, each emitted as a negated clause.
    pub exclude_locations: Vec<String>,
    /// Minimum follower count. `0` omits the clause entirely.
    pub min_followers: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            locations: vec!["Nepal".to_owned()],
            exclude_locations: Vec::new(),
            min_followers: 0,
        }
    }
}

/// One decoded page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Total matches the API reports for the query (all pages).
    pub total_count: u64,
    /// Whether the API has another page after this one.
    pub has_next_page: bool,
    /// Continuation token for the next page.
    pub end_cursor: Option<String>,
    /// User nodes on this page, in API order.
    pub nodes: Vec<UserNode>,
}

/// A user node as returned by the search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    pub followers: TotalCount,
    pub contributions_collection: ContributionsCollection,
    #[serde(default)]
    pub organizations: OrganizationConnection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: ContributionCalendar,
    pub total_commit_contributions: u64,
    pub restricted_contributions_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationConnection {
    #[serde(default)]
    pub nodes: Vec<OrganizationNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationNode {
    pub login: String,
}

/// A harvested account. Immutable once built by the search client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Unique identifier (login).
    pub username: String,
    /// Profile name, or the username when the profile has none.
    pub display_name: String,
    pub avatar_url: String,
    pub follower_count: u64,
    pub commit_count: u64,
    /// Calendar total minus restricted contributions. Not clamped, so
    /// inconsistent upstream data can drive it below zero.
    pub public_contribution_count: i64,
    /// Full calendar total, public and private.
    pub total_contribution_count: u64,
    /// Organization logins in API order. Duplicates are kept.
    pub organizations: Vec<String>,
}

impl AccountRecord {
    /// Build a record from an API node, normalising the display name.
    pub fn from_node(node: UserNode) -> Self {
        let contributions = node.contributions_collection;
        let total = contributions.contribution_calendar.total_contributions;
        let restricted = contributions.restricted_contributions_count;

        let display_name = match node.name {
            Some(name) if !name.is_empty() => name,
            _ => node.login.clone(),
        };

        Self {
            display_name,
            username: node.login,
            avatar_url: node.avatar_url,
            follower_count: node.followers.total_count,
            commit_count: contributions.total_commit_contributions,
            public_contribution_count: to_i64(total) - to_i64(restricted),
            total_contribution_count: total,
            organizations: node
                .organizations
                .nodes
                .into_iter()
                .map(|org| org.login)
                .collect(),
        }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}


#[cfg(test)]
mod tests {
    use super::fixtures::node;
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        let mut n = node("ram", 1, 1, 1);
        n.name = None;
        let record = AccountRecord::from_node(n);
        assert_eq!(record.display_name, "ram");
    }

    #[test]
    fn empty_display_name_falls_back_to_username() {
        let mut n = node("sita", 1, 1, 1);
        n.name = Some(String::new());
        let record = AccountRecord::from_node(n);
        assert_eq!(record.display_name, "sita");
    }

    #[test]
    fn whitespace_display_name_kept_as_is() {
        let mut n = node("gita", 1, 1, 1);
        n.name = Some(" ".into());
        let record = AccountRecord::from_node(n);
        assert_eq!(record.display_name, " ");
    }

    #[test]
    fn present_display_name_kept() {
        let record = AccountRecord::from_node(node("hari", 1, 1, 1));
        assert_eq!(record.display_name, "hari name");
    }

    #[test]
    fn public_contributions_subtract_restricted() {
        let mut n = node("gita", 3, 120, 7);
        n.contributions_collection.restricted_contributions_count = 20;
        let record = AccountRecord::from_node(n);
        assert_eq!(record.total_contribution_count, 120);
        assert_eq!(record.public_contribution_count, 100);
        assert_eq!(record.commit_count, 3);
        assert_eq!(record.follower_count, 7);
    }

    #[test]
    fn public_contributions_not_clamped() {
        let mut n = node("shyam", 0, 5, 0);
        n.contributions_collection.restricted_contributions_count = 9;
        let record = AccountRecord::from_node(n);
        assert_eq!(record.public_contribution_count, -4);
    }

    #[test]
    fn duplicate_organizations_preserved_in_order() {
        let mut n = node("bina", 0, 0, 0);
        n.organizations.nodes = ["b", "a", "b"]
            .iter()
            .map(|l| OrganizationNode {
                login: (*l).to_owned(),
            })
            .collect();
        let record = AccountRecord::from_node(n);
        assert_eq!(record.organizations, vec!["b", "a", "b"]);
    }

    #[test]
    fn user_node_decodes_api_shape() {
        let json = r#"{
            "login": "octo",
            "name": null,
            "avatarUrl": "https://avatars.example/octo",
            "followers": {"totalCount": 42},
            "contributionsCollection": {
                "contributionCalendar": {"totalContributions": 900},
                "totalCommitContributions": 600,
                "restrictedContributionsCount": 100
            },
            "organizations": {"nodes": [{"login": "acme"}]}
        }"#;
        let node: UserNode = serde_json::from_str(json).expect("deserialize");
        let record = AccountRecord::from_node(node);
        assert_eq!(record.username, "octo");
        assert_eq!(record.display_name, "octo");
        assert_eq!(record.follower_count, 42);
        assert_eq!(record.public_contribution_count, 800);
        assert_eq!(record.organizations, vec!["acme"]);
    }

    #[test]
    fn default_criteria_targets_nepal() {
        let criteria = SearchCriteria::default();
        assert_eq!(criteria.locations, vec!["Nepal"]);
        assert!(criteria.exclude_locations.is_empty());
        assert_eq!(criteria.min_followers, 0);
    }
}
