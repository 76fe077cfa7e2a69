mod backend;
mod config;
mod errors;
mod evidence;
mod markup;
mod models;
mod render;
mod session;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::fixture::FixtureBackend;
use crate::backend::{HttpBackend, QaBackend, SkillLogic};
use crate::config::Config;
use crate::errors::AskError;
use crate::evidence::ExpansionState;
use crate::render::PanelState;
use crate::session::state::{Phase, SessionState};
use crate::session::QuerySessionController;

#[derive(Parser)]
#[command(
    name = "cvq",
    version,
    about = "Ask natural-language questions against the resume-search backend"
)]
struct Args {
    /// One-shot question; omit to start the interactive prompt
    question: Vec<String>,

    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Answer from the canned fixture instead of the live service
    #[arg(long)]
    mock: bool,

    /// Skill matching mode: and | or (overrides SKILL_LOGIC)
    #[arg(long)]
    skill_logic: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let skill_logic: SkillLogic = match &args.skill_logic {
        Some(s) => s.parse().map_err(anyhow::Error::msg)?,
        None => config.skill_logic,
    };
    let base_url = args.base_url.unwrap_or_else(|| config.api_base_url.clone());

    let backend: Arc<dyn QaBackend> = if args.mock || config.use_mock {
        info!("using fixture backend");
        Arc::new(FixtureBackend::canned())
    } else {
        info!(%base_url, "using live backend");
        Arc::new(HttpBackend::new(&base_url)?)
    };

    let controller = QuerySessionController::new(backend, skill_logic);

    if !args.question.is_empty() {
        let question = args.question.join(" ");
        return one_shot(&controller, &question).await;
    }

    repl(&controller).await
}

/// Ask one question, print everything, exit.
async fn one_shot(ctrl: &QuerySessionController, question: &str) -> Result<()> {
    render::loading();
    ctrl.submit(question).await?;

    let state = ctrl.snapshot();
    if let Some(message) = &state.last_error {
        render::error_banner(message);
        std::process::exit(1);
    }
    if let Some(result) = &state.last_result {
        if let Some(answer) = &result.answer {
            render::answer_panel(answer, elapsed_ms(&state), &result.sections);
        }
        let panels = PanelState {
            facts_open: true,
            snippets_open: true,
        };
        render::evidence_panels(result, &panels, &ExpansionState::new(), state.generation);
        render::query_info(result, elapsed_ms(&state));
    }
    Ok(())
}

async fn repl(ctrl: &QuerySessionController) -> Result<()> {
    println!("CV Search console — ask about the candidate pool. /help for commands.");

    let mut panels = PanelState::default();
    let mut expansion = ExpansionState::new();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("cvq> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            // The input affordance: blank lines never reach submit.
            continue;
        }

        let mut parts = line.split_whitespace();
        match parts.next().unwrap_or_default() {
            "/quit" | "/exit" => break,
            "/help" => help(),
            "/history" => render::history_list(&ctrl.recent_history()),
            "/clear" => {
                ctrl.clear_history();
                println!("History cleared.");
            }
            "/dismiss" => ctrl.dismiss_error(),
            "/retry" => {
                render::loading();
                report(ctrl.retry().await);
                show_outcome(ctrl, &panels, &expansion);
            }
            "/again" => match parse_index(parts.next(), ctrl.recent_history().len()) {
                Some(n) => {
                    let question = ctrl.recent_history()[n].question.clone();
                    render::loading();
                    report(ctrl.select_from_history(&question).await);
                    show_outcome(ctrl, &panels, &expansion);
                }
                None => println!("Usage: /again N (see /history)"),
            },
            "/facts" => {
                panels.facts_open = !panels.facts_open;
                show_evidence(ctrl, &panels, &expansion);
            }
            "/snippets" => {
                panels.snippets_open = !panels.snippets_open;
                show_evidence(ctrl, &panels, &expansion);
            }
            "/expand" => {
                let state = ctrl.snapshot();
                let docs = state.last_result.as_ref().map_or(0, |r| r.docs.len());
                match parse_index(parts.next(), docs) {
                    Some(n) => {
                        expansion.toggle(state.generation, n);
                        panels.snippets_open = true;
                        show_evidence(ctrl, &panels, &expansion);
                    }
                    None => println!("Usage: /expand N"),
                }
            }
            unknown if unknown.starts_with('/') => {
                println!("Unknown command {unknown}; /help lists commands.");
            }
            _ => {
                render::loading();
                report(ctrl.submit(line).await);
                show_outcome(ctrl, &panels, &expansion);
            }
        }
    }

    Ok(())
}

/// Surfaces the pre-network rejections; backend failures arrive through
/// session state instead.
fn report(outcome: Result<(), AskError>) {
    match outcome {
        Ok(()) => {}
        // Blocked by the blank-line check already; no banner for it.
        Err(AskError::Validation(_)) => {}
        Err(e) => println!("{e}"),
    }
}

fn show_outcome(ctrl: &QuerySessionController, panels: &PanelState, expansion: &ExpansionState) {
    let state = ctrl.snapshot();
    if let Some(message) = &state.last_error {
        render::error_banner(message);
        return;
    }
    if state.phase != Phase::Succeeded {
        return;
    }
    if let Some(result) = &state.last_result {
        if let Some(answer) = &result.answer {
            render::answer_panel(answer, elapsed_ms(&state), &result.sections);
        }
        render::evidence_panels(result, panels, expansion, state.generation);
        render::query_info(result, elapsed_ms(&state));
    }
}

fn show_evidence(ctrl: &QuerySessionController, panels: &PanelState, expansion: &ExpansionState) {
    let state = ctrl.snapshot();
    match &state.last_result {
        Some(result) => render::evidence_panels(result, panels, expansion, state.generation),
        None => println!("No result yet — ask a question first."),
    }
}

/// Parses a 1-based index against a list length.
fn parse_index(arg: Option<&str>, len: usize) -> Option<usize> {
    let n: usize = arg?.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn elapsed_ms(state: &SessionState) -> Option<i64> {
    state.last_elapsed.map(|d| d.num_milliseconds())
}

fn help() {
    println!("Commands:");
    println!("  <question>   submit a question");
    println!("  /retry       re-submit the last question");
    println!("  /history     show recent questions");
    println!("  /again N     re-run question N from the history list");
    println!("  /facts       toggle the facts panel");
    println!("  /snippets    toggle the snippets panel");
    println!("  /expand N    expand or collapse snippet N");
    println!("  /dismiss     clear the error banner");
    println!("  /clear       clear the session history");
    println!("  /quit        exit");
}
