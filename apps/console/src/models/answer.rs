//! The `/ask` response: retrieved snippets and the assembled result.

use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateProfile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetMetadata {
    pub section: Option<String>,
    pub candidate_id: Option<String>,
    pub candidate_name: Option<String>,
    pub company: Option<String>,
    pub institution: Option<String>,
    pub source_file: Option<String>,
}

/// Relevance score pair. Distance and similarity are reported independently
/// by the vector store; neither implies the other and either may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetScore {
    pub distance: Option<f64>,
    pub similarity: Option<f64>,
}

/// A retrieved text fragment from the similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    #[serde(default)]
    pub metadata: SnippetMetadata,
    pub score: Option<SnippetScore>,
}

/// The immutable outcome of one query. `why` is carried on the wire but not
/// rendered downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResult {
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub facts: Vec<CandidateProfile>,
    #[serde(default)]
    pub docs: Vec<Snippet>,
    pub answer: Option<String>,
    pub why: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ignores_unknown_fields() {
        // The live backend includes an `ok` flag the client does not model.
        let json = r#"{"ok":true,"sections":["skills"],"facts":[],"docs":[],"answer":"hi"}"#;
        let result: AskResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.sections, vec!["skills"]);
        assert_eq!(result.answer.as_deref(), Some("hi"));
        assert!(result.why.is_none());
    }

    #[test]
    fn test_score_fields_independently_nullable() {
        let json = r#"{"text":"t","metadata":{},"score":{"distance":0.2}}"#;
        let snippet: Snippet = serde_json::from_str(json).unwrap();
        let score = snippet.score.unwrap();
        assert_eq!(score.distance, Some(0.2));
        assert!(score.similarity.is_none());
    }

    #[test]
    fn test_snippet_without_score() {
        let json = r#"{"text":"t"}"#;
        let snippet: Snippet = serde_json::from_str(json).unwrap();
        assert!(snippet.score.is_none());
        assert!(snippet.metadata.section.is_none());
    }
}
