pub mod config;
pub mod error;
pub mod http;
pub mod runtime;
pub mod search;

pub use config::{SearchConfig, SearchType};
pub use error::SearchError;
pub use search::{SearchClient, SearchOverrides, SnippetResult};
