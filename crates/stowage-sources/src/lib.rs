//! Concrete filesystems and the uri resolver
//!
//! - `GitHubFileSystem`: raw content of a GitHub repository at a root
//! - `GitFileSystem`: a local git repository at a revision
//! - `UriResolver`: maps uris to one of the above, local disk or memory

pub mod git;
pub mod github;
pub mod resolver;

pub use git::GitFileSystem;
pub use github::{GitHubFileSystem, GitHubOptions};
pub use resolver::UriResolver;
