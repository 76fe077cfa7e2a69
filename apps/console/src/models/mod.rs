pub mod answer;
pub mod candidate;

pub use answer::{AskResult, Snippet, SnippetMetadata, SnippetScore};
pub use candidate::{CandidateProfile, Certification, Education, Experience, Link, LinkKind};
