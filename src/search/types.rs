use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SearchType;

/// Body returned by the search service. Unknown fields are ignored.
///
/// Loosely typed fields stay as [`Value`] so that an unexpected shape in one
/// block does not make the whole response undecodable.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub answer_box: Option<AnswerBox>,
    pub knowledge_graph: Option<KnowledgeGraph>,
    pub organic: Option<Vec<ResultEntry>>,
    pub news: Option<Vec<ResultEntry>>,
    pub places: Option<Vec<ResultEntry>>,
    pub images: Option<Vec<ResultEntry>>,
}

impl SearchResponse {
    /// Result list for the given category, if the response carries one.
    pub fn results(&self, search_type: SearchType) -> Option<&[ResultEntry]> {
        let list = match search_type {
            SearchType::Search => &self.organic,
            SearchType::News => &self.news,
            SearchType::Places => &self.places,
            SearchType::Images => &self.images,
        };
        list.as_deref()
    }
}

/// Direct answer shown above the results.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBox {
    pub answer: Option<Value>,
    pub snippet: Option<Value>,
    pub snippet_highlighted: Option<Value>,
}

/// Knowledge panel describing a single entity.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct KnowledgeGraph {
    pub title: Option<Value>,
    #[serde(rename = "type")]
    pub entity_type: Option<Value>,
    pub description: Option<Value>,
    pub attributes: Option<Value>,
}

impl KnowledgeGraph {
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.attributes.as_ref().and_then(Value::as_object)
    }
}

/// One entry of a category list (`organic`, `news`, ...).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ResultEntry {
    pub title: Option<Value>,
    pub link: Option<Value>,
    pub snippet: Option<Value>,
    pub attributes: Option<Value>,
}

impl ResultEntry {
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.attributes.as_ref().and_then(Value::as_object)
    }
}

/// Snippets extracted from one search, plus the link of the last result that had one.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SnippetResult {
    pub snippets: Vec<String>,
    pub link: Option<String>,
}

impl SnippetResult {
    /// Returned when nothing in the response carried a snippet.
    pub const NO_RESULT_MSG: &'static str = "No good result was found";

    pub fn no_result() -> Self {
        Self {
            snippets: vec![Self::NO_RESULT_MSG.to_string()],
            link: None,
        }
    }

    pub fn is_no_result(&self) -> bool {
        self.link.is_none() && self.snippets == [Self::NO_RESULT_MSG]
    }
}
