//! Page source implementations.

pub mod github;

pub use github::GitHubGraphQl;
