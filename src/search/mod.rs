//! Search API client: request, retry, and snippet extraction.

mod client;
mod request;
mod snippets;
mod types;

pub use client::SearchClient;
pub use request::{SearchOverrides, build_request_body};
pub use snippets::extract_snippets;
pub use types::{AnswerBox, KnowledgeGraph, ResultEntry, SearchResponse, SnippetResult};
