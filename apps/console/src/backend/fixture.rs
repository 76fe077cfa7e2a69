//! Canned backend for local development without a running search service.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::{QaBackend, SkillLogic};
use crate::errors::AskError;
use crate::models::{
    AskResult, CandidateProfile, Certification, Education, Experience, Link, LinkKind, Snippet,
    SnippetMetadata, SnippetScore,
};

const DEFAULT_DELAY_MS: u64 = 800;

/// Resolves every question with the same fixed result after a simulated
/// delay, regardless of the question text.
pub struct FixtureBackend {
    delay: Duration,
    result: AskResult,
}

impl FixtureBackend {
    pub fn new(delay: Duration, result: AskResult) -> Self {
        Self { delay, result }
    }

    /// The stock fixture: one candidate fact, two snippets, a bold-markup
    /// answer.
    pub fn canned() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DELAY_MS), canned_result())
    }
}

impl Default for FixtureBackend {
    fn default() -> Self {
        Self::canned()
    }
}

#[async_trait]
impl QaBackend for FixtureBackend {
    async fn ask(&self, question: &str, _skill_logic: SkillLogic) -> Result<AskResult, AskError> {
        debug!(question, "fixture backend answering");
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone())
    }
}

fn canned_result() -> AskResult {
    let candidate_id = "123e4567-e89b-12d3-a456-426614174000";
    AskResult {
        sections: vec!["skills".to_string(), "experience".to_string()],
        facts: vec![CandidateProfile {
            full_name: Some("Amanda Lawrence".to_string()),
            email: Some("amanda.lawrence@email.com".to_string()),
            phone: Some("555-0123".to_string()),
            location: Some("San Francisco, CA".to_string()),
            links: vec![
                Link {
                    kind: Some(LinkKind::Linkedin),
                    url: "https://linkedin.com/in/amandal".to_string(),
                },
                Link {
                    kind: Some(LinkKind::Github),
                    url: "https://github.com/amandal".to_string(),
                },
            ],
            summary: Some(
                "Senior software engineer with 8+ years of experience in full-stack development."
                    .to_string(),
            ),
            skills: [
                "React",
                "Python",
                "TypeScript",
                "Node.js",
                "PostgreSQL",
                "AWS",
                "Docker",
                "GraphQL",
                "REST APIs",
                "CI/CD",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            education: vec![Education {
                institution: "Stanford University".to_string(),
                degree: Some("Bachelor of Science".to_string()),
                field: Some("Computer Science".to_string()),
                start_year: Some(2011),
                end_year: Some(2015),
            }],
            experience: vec![
                Experience {
                    company: "Tech Innovations LLC".to_string(),
                    title: Some("Senior Software Engineer".to_string()),
                    start: Some("2020-01".to_string()),
                    end: Some("Present".to_string()),
                    description: Some(
                        "Led development of React-based web applications with Python backends."
                            .to_string(),
                    ),
                },
                Experience {
                    company: "StartupXYZ".to_string(),
                    title: Some("Full Stack Developer".to_string()),
                    start: Some("2017-06".to_string()),
                    end: Some("2019-12".to_string()),
                    description: Some(
                        "Built and maintained multiple microservices using Python and React."
                            .to_string(),
                    ),
                },
            ],
            certifications: Some(vec![Certification {
                name: "AWS Certified Solutions Architect".to_string(),
                year: Some(2021),
                issuer: Some("Amazon Web Services".to_string()),
            }]),
        }],
        docs: vec![
            Snippet {
                text: "Led development of React-based web applications with Python backends. \
                       Implemented responsive UI components using modern React patterns and hooks. \
                       Built REST APIs and GraphQL endpoints using Python/FastAPI."
                    .to_string(),
                metadata: SnippetMetadata {
                    section: Some("experience".to_string()),
                    candidate_id: Some(candidate_id.to_string()),
                    candidate_name: Some("Amanda Lawrence".to_string()),
                    company: Some("Tech Innovations LLC".to_string()),
                    institution: None,
                    source_file: Some("data/pdf/Amanda_Lawrence.pdf".to_string()),
                },
                score: Some(SnippetScore {
                    distance: Some(0.14),
                    similarity: Some(0.86),
                }),
            },
            Snippet {
                text: "Technical Skills: React, Python, TypeScript, Node.js, PostgreSQL, AWS, \
                       Docker, GraphQL, REST APIs, CI/CD, Jest, Pytest, Git"
                    .to_string(),
                metadata: SnippetMetadata {
                    section: Some("skills".to_string()),
                    candidate_id: Some(candidate_id.to_string()),
                    candidate_name: Some("Amanda Lawrence".to_string()),
                    company: None,
                    institution: None,
                    source_file: Some("data/pdf/Amanda_Lawrence.pdf".to_string()),
                },
                score: Some(SnippetScore {
                    distance: Some(0.18),
                    similarity: Some(0.82),
                }),
            },
        ],
        answer: Some(
            "**Amanda Lawrence** has extensive experience with both React and Python. She has \
             worked as a Senior Software Engineer at Tech Innovations LLC since 2020, where she \
             led development of React-based web applications with Python backends. Her skill set \
             includes React, Python, TypeScript, and related technologies. She previously worked \
             at StartupXYZ building microservices using Python and React."
                .to_string(),
        ),
        why: None,
    }
}
