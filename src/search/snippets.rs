//! Turns a [`SearchResponse`] into readable snippets.
//!
//! Order of the output:
//!
//! 1. answer box: `answer`, `snippet` (newlines flattened), `snippetHighlighted`
//! 2. knowledge graph: `"{title}: {type}."`, description, `"{title} {key}: {value}."`
//! 3. the first `k` entries of the category list that carry a `snippet`
//! 4. `"{key}: {value}."` for the attributes of the last entry visited in step 3
//!
//! The link is taken from every entry in step 3 that has a snippet, so the
//! last one wins. Step 4 only looks at the final visited entry, whether or not
//! that entry had a snippet.

use serde_json::{Map, Value};

use super::types::{AnswerBox, KnowledgeGraph, ResultEntry, SearchResponse, SnippetResult};
use crate::config::SearchType;

pub fn extract_snippets(
    response: &SearchResponse,
    search_type: SearchType,
    k: usize,
) -> SnippetResult {
    let mut snippets = Vec::new();
    let mut link = None;

    if let Some(answer_box) = &response.answer_box {
        push_answer_box(&mut snippets, answer_box);
    }

    if let Some(kg) = &response.knowledge_graph {
        push_knowledge_graph(&mut snippets, kg);
    }

    if let Some(entries) = response.results(search_type) {
        let mut last: Option<&ResultEntry> = None;

        for entry in entries.iter().take(k) {
            if let Some(snippet) = &entry.snippet {
                link = entry.link.as_ref().map(display_value);
                snippets.push(display_value(snippet));
            }
            last = Some(entry);
        }

        if let Some(attributes) = last.and_then(ResultEntry::attributes) {
            push_attributes(&mut snippets, None, attributes);
        }
    }

    if snippets.is_empty() {
        return SnippetResult::no_result();
    }

    SnippetResult { snippets, link }
}

fn push_answer_box(snippets: &mut Vec<String>, answer_box: &AnswerBox) {
    if let Some(Value::String(answer)) = &answer_box.answer {
        if !answer.is_empty() {
            snippets.push(answer.clone());
        }
    }
    if let Some(Value::String(snippet)) = &answer_box.snippet {
        if !snippet.is_empty() {
            snippets.push(snippet.replace('\n', " "));
        }
    }
    if let Some(highlighted) = answer_box.snippet_highlighted.as_ref().filter(|v| is_truthy(v)) {
        snippets.push(match highlighted {
            Value::Array(parts) => parts
                .iter()
                .map(display_value)
                .collect::<Vec<_>>()
                .join(" "),
            other => display_value(other),
        });
    }
}

fn push_knowledge_graph(snippets: &mut Vec<String>, kg: &KnowledgeGraph) {
    let title = kg.title.as_ref().filter(|v| is_truthy(v)).map(display_value);

    if let Some(entity_type) = kg.entity_type.as_ref().filter(|v| is_truthy(v)) {
        snippets.push(match &title {
            Some(title) => format!("{}: {}.", title, display_value(entity_type)),
            None => format!("{}.", display_value(entity_type)),
        });
    }

    if let Some(description) = kg.description.as_ref().filter(|v| is_truthy(v)) {
        snippets.push(display_value(description));
    }

    if let Some(attributes) = kg.attributes() {
        push_attributes(snippets, title.as_deref(), attributes);
    }
}

fn push_attributes(snippets: &mut Vec<String>, prefix: Option<&str>, attributes: &Map<String, Value>) {
    for (key, value) in attributes {
        snippets.push(match prefix {
            Some(prefix) => format!("{} {}: {}.", prefix, key, display_value(value)),
            None => format!("{}: {}.", key, display_value(value)),
        });
    }
}

/// Strings verbatim, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> SearchResponse {
        serde_json::from_value(body).unwrap()
    }

    fn extract(body: Value) -> SnippetResult {
        extract_snippets(&parse(body), SearchType::Search, 10)
    }

    #[test]
    fn test_answer_only() {
        let result = extract(json!({"answerBox": {"answer": "Paris"}}));
        assert_eq!(result.snippets, vec!["Paris"]);
        assert_eq!(result.link, None);
    }

    #[test]
    fn test_answer_box_order_and_newlines() {
        let result = extract(json!({
            "answerBox": {
                "snippetHighlighted": ["highlighted", "part"],
                "snippet": "first line\nsecond line",
                "answer": "answer"
            }
        }));
        assert_eq!(
            result.snippets,
            vec!["answer", "first line second line", "highlighted part"]
        );
    }

    #[test]
    fn test_non_string_answer_is_ignored() {
        let result = extract(json!({"answerBox": {"answer": 42, "snippet": ""}}));
        assert!(result.is_no_result());
    }

    #[test]
    fn test_knowledge_graph() {
        let result = extract(json!({
            "knowledgeGraph": {
                "title": "Rust",
                "type": "Programming language",
                "description": "A systems language.",
                "attributes": {"Designed by": "Graydon Hoare", "First appeared": "2010"}
            }
        }));
        assert_eq!(
            result.snippets,
            vec![
                "Rust: Programming language.",
                "A systems language.",
                "Rust Designed by: Graydon Hoare.",
                "Rust First appeared: 2010.",
            ]
        );
        assert_eq!(result.link, None);
    }

    #[test]
    fn test_knowledge_graph_without_title() {
        let result = extract(json!({
            "knowledgeGraph": {"type": "City", "attributes": {"Population": 2100000}}
        }));
        assert_eq!(result.snippets, vec!["City.", "Population: 2100000."]);
    }

    #[test]
    fn test_two_entries_last_link_wins() {
        let result = extract(json!({
            "organic": [
                {"snippet": "first", "link": "https://one.example"},
                {"snippet": "second", "link": "https://two.example"}
            ]
        }));
        assert_eq!(result.snippets, vec!["first", "second"]);
        assert_eq!(result.link.as_deref(), Some("https://two.example"));
    }

    #[test]
    fn test_entry_without_snippet_keeps_previous_link() {
        let result = extract(json!({
            "organic": [
                {"snippet": "first", "link": "https://one.example"},
                {"link": "https://two.example"}
            ]
        }));
        assert_eq!(result.snippets, vec!["first"]);
        assert_eq!(result.link.as_deref(), Some("https://one.example"));
    }

    #[test]
    fn test_snippet_entry_without_link_clears_link() {
        let result = extract(json!({
            "organic": [
                {"snippet": "first", "link": "https://one.example"},
                {"snippet": "second"}
            ]
        }));
        assert_eq!(result.snippets, vec!["first", "second"]);
        assert_eq!(result.link, None);
    }

    #[test]
    fn test_only_first_k_entries_are_read() {
        let response = parse(json!({
            "organic": [
                {"snippet": "a", "link": "https://a.example"},
                {"snippet": "b", "link": "https://b.example"},
                {"snippet": "c", "link": "https://c.example"}
            ]
        }));
        let result = extract_snippets(&response, SearchType::Search, 1);
        assert_eq!(result.snippets, vec!["a"]);
        assert_eq!(result.link.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_attributes_come_from_last_visited_entry_only() {
        let result = extract(json!({
            "organic": [
                {"snippet": "a", "link": "https://a.example", "attributes": {"Ignored": "yes"}},
                {"title": "no snippet here", "attributes": {"Price": "$10", "Rating": "4.5"}}
            ]
        }));
        assert_eq!(result.snippets, vec!["a", "Price: $10.", "Rating: 4.5."]);
        assert_eq!(result.link.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_category_selects_list() {
        let response = parse(json!({
            "organic": [{"snippet": "web", "link": "https://web.example"}],
            "news": [{"snippet": "news", "link": "https://news.example"}]
        }));
        let result = extract_snippets(&response, SearchType::News, 5);
        assert_eq!(result.snippets, vec!["news"]);
        assert_eq!(result.link.as_deref(), Some("https://news.example"));

        let result = extract_snippets(&response, SearchType::Images, 5);
        assert!(result.is_no_result());
    }

    #[test]
    fn test_answer_box_text_without_list_link() {
        let result = extract(json!({
            "answerBox": {"answer": "yes"},
            "organic": [{"title": "no snippet", "link": "https://x.example"}]
        }));
        assert_eq!(result.snippets, vec!["yes"]);
        assert_eq!(result.link, None);
    }

    #[test]
    fn test_nothing_found() {
        for body in [
            json!({}),
            json!({"organic": []}),
            json!({"answerBox": {}, "knowledgeGraph": {"title": "only a title"}}),
        ] {
            let result = extract(body);
            assert_eq!(result, SnippetResult::no_result());
        }
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!([0])));
    }
}
