//! Terminal presentation. Everything here is incidental display wiring; the
//! policies it renders (windows, truncation, markup tree) live in
//! `evidence.rs` and `markup.rs`.

use console::style;

use crate::evidence::{self, CandidateCard, ExpansionState, SnippetView, EXPANSION_LINE_LIMIT};
use crate::markup::{self, Inline, Paragraph};
use crate::models::AskResult;
use crate::session::history::HistoryEntry;

/// Open/closed flags for the two evidence panels. Local UI state only; not
/// part of the result and never persisted to history.
#[derive(Debug, Default)]
pub struct PanelState {
    pub facts_open: bool,
    pub snippets_open: bool,
}

pub fn loading() {
    println!("{}", style("Finding answers...").dim());
}

pub fn error_banner(message: &str) {
    println!(
        "{} {}",
        style("error:").red().bold(),
        style(message).red()
    );
    println!("{}", style("  /retry to try again, /dismiss to clear").dim());
}

pub fn answer_panel(answer: &str, elapsed_ms: Option<i64>, sections: &[String]) {
    println!("{}", style("Answer").bold().underlined());
    let mut meta = Vec::new();
    if let Some(ms) = elapsed_ms {
        meta.push(format!("{ms}ms"));
    }
    if !sections.is_empty() {
        meta.push(format!("Sections: {}", sections.join(", ")));
    }
    if !meta.is_empty() {
        println!("{}", style(meta.join(" · ")).dim());
    }
    println!();
    print_markup(&markup::format(answer));
}

fn print_markup(paragraphs: &[Paragraph]) {
    for Paragraph(inlines) in paragraphs {
        let line: String = inlines
            .iter()
            .map(|node| match node {
                Inline::Text(t) => t.clone(),
                Inline::Bold(t) => style(t).bold().to_string(),
                Inline::Italic(t) => style(t).italic().to_string(),
            })
            .collect();
        println!("{line}");
        println!();
    }
}

pub fn query_info(result: &AskResult, elapsed_ms: Option<i64>) {
    println!("{}", style("Query Info").bold());
    println!(
        "  Response time: {}",
        elapsed_ms.map_or("-".to_string(), |ms| format!("{ms}ms"))
    );
    println!("  Facts found: {}", result.facts.len());
    println!("  Snippets found: {}", result.docs.len());
    println!("  Sections used: {}", result.sections.len());
}

pub fn history_list(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", style("No questions asked yet.").dim());
        return;
    }
    println!("{}", style("Recent Questions").bold());
    for (n, entry) in entries.iter().enumerate() {
        println!("  {}. {}", n + 1, entry.question);
    }
    println!("{}", style("  /again N to re-run one").dim());
}

/// Renders the facts and snippets panels per their open/closed state.
pub fn evidence_panels(
    result: &AskResult,
    panels: &PanelState,
    expansion: &ExpansionState,
    generation: u64,
) {
    let facts_marker = if panels.facts_open { "▾" } else { "▸" };
    println!(
        "{} {}",
        style(facts_marker).dim(),
        style(format!("Facts (SQL) · {}", result.facts.len())).bold()
    );
    if panels.facts_open {
        for profile in &result.facts {
            candidate(&evidence::candidate_card(profile));
        }
    }

    let snippets_marker = if panels.snippets_open { "▾" } else { "▸" };
    println!(
        "{} {}",
        style(snippets_marker).dim(),
        style(format!("Snippets (Vector) · {}", result.docs.len())).bold()
    );
    if panels.snippets_open {
        for (idx, doc) in result.docs.iter().enumerate() {
            snippet(
                idx,
                &evidence::snippet_view(doc),
                expansion.is_expanded(generation, idx),
            );
        }
    }
}

fn candidate(card: &CandidateCard) {
    println!("  {}", style(&card.name).bold());
    if let Some(location) = &card.location {
        println!("    {location}");
    }
    if let Some(summary) = &card.summary {
        println!("    {}", style(summary).dim());
    }
    if !card.experience.is_empty() {
        println!("    {}", style("Experience").underlined());
        for line in &card.experience {
            match &line.period {
                Some(period) => println!(
                    "      {} at {} {}",
                    style(&line.title).bold(),
                    line.company,
                    style(period).dim()
                ),
                None => println!("      {} at {}", style(&line.title).bold(), line.company),
            }
        }
    }
    if let Some(education) = &card.education {
        println!("    {}", style("Education").underlined());
        println!("      {education}");
    }
    if !card.skills.is_empty() {
        println!("    {}", style("Skills").underlined());
        let mut skills = card.skills.join(", ");
        if card.more_skills > 0 {
            skills.push_str(&format!(" +{} more", card.more_skills));
        }
        println!("      {skills}");
    }
}

fn snippet(idx: usize, view: &SnippetView, expanded: bool) {
    let mut header = vec![format!(
        "[{}] {}",
        idx + 1,
        view.section.as_deref().unwrap_or("unknown")
    )];
    if let Some(company) = &view.company {
        header.push(company.clone());
    }
    if let Some(institution) = &view.institution {
        header.push(institution.clone());
    }
    if let Some(similarity) = view.similarity {
        header.push(format!("sim: {similarity:.2}"));
    }
    if let Some(distance) = view.distance {
        header.push(format!("dist: {distance:.2}"));
    }
    println!("  {}", style(header.join(" · ")).dim());

    if view.needs_expansion && !expanded {
        for line in view.text.split('\n').take(EXPANSION_LINE_LIMIT) {
            println!("    {line}");
        }
        println!("    {}", style(format!("… /expand {} for more", idx + 1)).dim());
    } else {
        for line in view.text.split('\n') {
            println!("    {line}");
        }
    }

    if let Some(name) = &view.candidate_name {
        println!("    {}", style(format!("Candidate: {name}")).dim());
    }
}
