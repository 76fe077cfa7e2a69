//! Display views over the evidence set (facts + snippets) of one result.
//!
//! Everything here is a pure view builder: the underlying `CandidateProfile`
//! and `Snippet` values are read, never mutated, and the windowing below is a
//! display policy only. Callers needing full lists use the raw profile.

#![allow(dead_code)]

use std::collections::HashSet;

use crate::models::{CandidateProfile, Snippet};

/// Snippet text is cut at this many characters before display.
pub const SNIPPET_TEXT_LIMIT: usize = 1500;
/// Snippets spanning more than this many lines collapse behind an expander.
pub const EXPANSION_LINE_LIMIT: usize = 8;
/// Experience entries shown per candidate card.
pub const EXPERIENCE_WINDOW: usize = 2;
/// Skills shown per candidate card; the rest is a "+N more" count.
pub const SKILLS_WINDOW: usize = 10;

const ELLIPSIS: char = '…';

/// Display-ready form of one retrieved snippet.
#[derive(Debug, Clone)]
pub struct SnippetView {
    pub text: String,
    pub truncated: bool,
    pub needs_expansion: bool,
    pub section: Option<String>,
    pub candidate_name: Option<String>,
    pub company: Option<String>,
    pub institution: Option<String>,
    pub source_file: Option<String>,
    pub similarity: Option<f64>,
    pub distance: Option<f64>,
}

/// Builds the display view of a snippet.
///
/// Text is truncated to [`SNIPPET_TEXT_LIMIT`] characters with a one-character
/// ellipsis appended when cut; the cut is purely length-based, not
/// word-aligned. `needs_expansion` is judged on the truncated text.
pub fn snippet_view(snippet: &Snippet) -> SnippetView {
    let (text, truncated) = truncate(&snippet.text, SNIPPET_TEXT_LIMIT);
    let needs_expansion = text.split('\n').count() > EXPANSION_LINE_LIMIT;
    let score = snippet.score.clone().unwrap_or_default();

    SnippetView {
        text,
        truncated,
        needs_expansion,
        section: snippet.metadata.section.clone(),
        candidate_name: snippet.metadata.candidate_name.clone(),
        company: snippet.metadata.company.clone(),
        institution: snippet.metadata.institution.clone(),
        source_file: snippet.metadata.source_file.clone(),
        similarity: score.similarity,
        distance: score.distance,
    }
}

fn truncate(text: &str, limit: usize) -> (String, bool) {
    if text.chars().count() <= limit {
        return (text.to_string(), false);
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push(ELLIPSIS);
    (cut, true)
}

/// One experience line on a candidate card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceLine {
    pub title: String,
    pub company: String,
    pub period: Option<String>,
}

/// Display-ready form of one candidate fact.
#[derive(Debug, Clone)]
pub struct CandidateCard {
    pub name: String,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceLine>,
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub more_skills: usize,
}

/// Builds the summary card for a candidate fact: first
/// [`EXPERIENCE_WINDOW`] experience entries in given order, first education
/// entry only, first [`SKILLS_WINDOW`] skills plus a remainder count.
pub fn candidate_card(profile: &CandidateProfile) -> CandidateCard {
    let experience = profile
        .experience
        .iter()
        .take(EXPERIENCE_WINDOW)
        .map(|exp| ExperienceLine {
            title: exp.title.clone().unwrap_or_else(|| "Position".to_string()),
            company: exp.company.clone(),
            period: period_label(exp.start.as_deref(), exp.end.as_deref()),
        })
        .collect();

    let education = profile.education.first().map(|edu| {
        let field = edu.field.as_deref().unwrap_or("Field of Study");
        match edu.degree.as_deref() {
            Some(degree) => format!("{degree} in {field} · {}", edu.institution),
            None => format!("{field} · {}", edu.institution),
        }
    });

    CandidateCard {
        name: profile
            .full_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        location: profile.location.clone(),
        summary: profile.summary.clone(),
        experience,
        education,
        skills: profile.skills.iter().take(SKILLS_WINDOW).cloned().collect(),
        more_skills: profile.skills.len().saturating_sub(SKILLS_WINDOW),
    }
}

fn period_label(start: Option<&str>, end: Option<&str>) -> Option<String> {
    if start.is_none() && end.is_none() {
        return None;
    }
    Some(format!(
        "{} - {}",
        start.unwrap_or_default(),
        end.unwrap_or("Present")
    ))
}

/// Per-snippet expand/collapse toggles for the current evidence set.
///
/// Flags are keyed by the owning result's generation plus the snippet's
/// position in `docs`; touching the state with a newer generation clears it,
/// so expansion never leaks across queries.
#[derive(Debug, Default)]
pub struct ExpansionState {
    generation: u64,
    expanded: HashSet<usize>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, generation: u64, index: usize) {
        self.sync(generation);
        if !self.expanded.insert(index) {
            self.expanded.remove(&index);
        }
    }

    pub fn is_expanded(&self, generation: u64, index: usize) -> bool {
        generation == self.generation && self.expanded.contains(&index)
    }

    fn sync(&mut self, generation: u64) {
        if generation != self.generation {
            self.generation = generation;
            self.expanded.clear();
        }
    }
}
