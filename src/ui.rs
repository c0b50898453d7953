// UI layer: collects the endpoint and its parameters with `dialoguer`
// prompts, runs the request and hands the response to the renderer.
// Deciding what to ask and how answers map onto a request is kept in
// plain functions so it can be tested without a terminal.

use crate::api::{Request, RobotEventsClient};
use crate::endpoints::{self, Endpoint};
use crate::models;
use crate::render::{export_csv, Renderer, Shape};
use anyhow::{Context, Result};
use dialoguer::{Completion, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_PER_PAGE: u32 = 10;

/// Tab completion over a fixed word list.
pub struct WordCompleter {
    words: Vec<&'static str>,
}

impl WordCompleter {
    pub fn new(words: Vec<&'static str>) -> Self {
        WordCompleter { words }
    }
}

impl Completion for WordCompleter {
    /// The single word starting with `input`, or the longest prefix all
    /// candidates share when it is longer than what was typed.
    fn get(&self, input: &str) -> Option<String> {
        let matches: Vec<&str> = self
            .words
            .iter()
            .copied()
            .filter(|w| w.starts_with(input))
            .collect();
        match matches.as_slice() {
            [] => None,
            [only] => Some(only.to_string()),
            [first, rest @ ..] => {
                let mut prefix: &str = first;
                for word in rest {
                    let common = prefix
                        .char_indices()
                        .zip(word.chars())
                        .take_while(|((_, a), b)| a == b)
                        .last()
                        .map(|((i, c), _)| i + c.len_utf8())
                        .unwrap_or(0);
                    prefix = &prefix[..common];
                }
                (prefix.len() > input.len()).then(|| prefix.to_string())
            }
        }
    }
}

/// Resource an endpoint is rooted at; its identifier fills `{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Team,
    Event,
    Season,
    Program,
}

impl Resource {
    pub fn of(endpoint: &Endpoint) -> Option<Self> {
        match endpoint.name.split('_').next()? {
            "team" | "teams" => Some(Resource::Team),
            "event" | "events" => Some(Resource::Event),
            "season" | "seasons" => Some(Resource::Season),
            "program" | "programs" => Some(Resource::Program),
            _ => None,
        }
    }
}

/// Which prompts an endpoint needs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PromptPlan {
    pub team: bool,
    pub season: bool,
    pub event: bool,
    pub division: bool,
    pub program: bool,
    pub per_page: bool,
}

impl PromptPlan {
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        let name = endpoint.name;
        PromptPlan {
            team: name.contains("team"),
            season: name.contains("season") || name == "team_events",
            event: name.contains("event"),
            division: name.contains("division"),
            program: name == "program",
            per_page: name == "team_events",
        }
    }
}

/// Answers gathered from the prompts, already coerced to ids.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selections {
    pub team: Option<u32>,
    pub season: Option<u32>,
    pub event: Option<u64>,
    pub division: Option<u64>,
    pub program: Option<u64>,
    pub per_page: Option<u32>,
}

/// Endpoints that accept a `team[]` filter next to their own `{id}`.
const TEAM_FILTERED: &[&str] = &[
    "event_skills",
    "event_awards",
    "event_division_matches",
    "event_division_finalist_rankings",
    "event_division_rankings",
];

/// Endpoints that accept an `event[]` filter next to their own `{id}`.
const EVENT_FILTERED: &[&str] = &["team_matches", "team_rankings", "team_skills", "team_awards"];

/// Turn the collected answers into a request. `{id}` is bound from the
/// endpoint's own resource; other identifiers become query filters where
/// the endpoint accepts one.
pub fn plan_request(endpoint: &'static Endpoint, selections: &Selections) -> Request {
    bind(endpoint, selections).0
}

/// Answers that neither fill a placeholder nor a query filter for
/// `endpoint`.
pub fn ignored_answers(endpoint: &'static Endpoint, selections: &Selections) -> Vec<&'static str> {
    bind(endpoint, selections).1
}

fn bind(endpoint: &'static Endpoint, selections: &Selections) -> (Request, Vec<&'static str>) {
    let mut req = Request::new(endpoint);
    let mut ignored = Vec::new();
    let resource = Resource::of(endpoint);
    let name = endpoint.name;

    if let Some(team) = selections.team {
        if resource == Some(Resource::Team) && name != "teams" {
            req = req.path_param("id", team);
        } else if TEAM_FILTERED.contains(&name) {
            req = req.query_param("team[]", team);
        } else {
            ignored.push("team");
        }
    }

    if let Some(event) = selections.event {
        if resource == Some(Resource::Event) && name != "events" {
            req = req.path_param("id", event);
        } else if EVENT_FILTERED.contains(&name) {
            req = req.query_param("event[]", event);
        } else {
            ignored.push("event ID");
        }
    }

    if let Some(season) = selections.season {
        if resource == Some(Resource::Season) && name != "seasons" {
            req = req.path_param("id", season);
        } else if name == "team_events" {
            let per_page = selections.per_page.unwrap_or(DEFAULT_PER_PAGE);
            req = req.query_param("per_page", per_page).query_param("season", season);
        } else {
            ignored.push("season");
        }
    }

    if let Some(program) = selections.program {
        if resource == Some(Resource::Program) {
            req = req.path_param("id", program);
        } else {
            ignored.push("program ID");
        }
    }

    if let Some(div) = selections.division {
        req = req.path_param("div", div);
    }

    (req, ignored)
}

/// Match the typed endpoint name against the registry, ignoring
/// surrounding whitespace.
pub fn choose_endpoint(text: &str) -> Option<&'static Endpoint> {
    endpoints::lookup(text.trim()).ok()
}

/// Outcome of coercing one free-text answer.
#[derive(Debug, PartialEq, Eq)]
pub enum Answer<T> {
    Empty,
    Valid(T),
    Invalid,
}

pub fn parse_named(text: &str, lookup: fn(&str) -> Option<u32>) -> Answer<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Answer::Empty;
    }
    lookup(text).map(Answer::Valid).unwrap_or(Answer::Invalid)
}

pub fn parse_number<T: std::str::FromStr>(text: &str) -> Answer<T> {
    let text = text.trim();
    if text.is_empty() {
        return Answer::Empty;
    }
    text.parse().map(Answer::Valid).unwrap_or(Answer::Invalid)
}

fn ask(
    prompt: &str,
    completer: Option<&WordCompleter>,
    default: Option<&str>,
) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(c) = completer {
        input = input.completion_with(c);
    }
    if let Some(d) = default {
        input = input.default(d.to_string());
    }
    Ok(input.interact_text()?)
}

/// Free-text integer prompt. Outer `None` means the answer was rejected.
fn ask_number(prompt: &str, label: &str) -> Result<Option<Option<u64>>> {
    let text = ask(prompt, None, None)?;
    match parse_number::<u64>(&text) {
        Answer::Valid(v) => Ok(Some(Some(v))),
        Answer::Empty => Ok(Some(None)),
        Answer::Invalid => {
            println!("Invalid {}: {}", label, text.trim());
            Ok(None)
        }
    }
}

/// Ask every prompt the plan calls for. `None` means the user gave an
/// invalid answer; the message has already been printed.
fn collect(plan: PromptPlan) -> Result<Option<Selections>> {
    let mut selections = Selections::default();

    if plan.team {
        let completer = WordCompleter::new(models::team_names());
        let prompt = "Enter team (use tab for suggestions, or leave empty for none)";
        let text = ask(prompt, Some(&completer), None)?;
        match parse_named(&text, models::team_id) {
            Answer::Valid(id) => selections.team = Some(id),
            Answer::Empty => {}
            Answer::Invalid => {
                println!("Invalid team: {}", text.trim());
                return Ok(None);
            }
        }
    }

    if plan.season {
        let completer = WordCompleter::new(models::season_names());
        let prompt = "Enter season (use tab for suggestions, or leave empty for none)";
        let text = ask(prompt, Some(&completer), None)?;
        match parse_named(&text, models::season_id) {
            Answer::Valid(id) => selections.season = Some(id),
            Answer::Empty => {}
            Answer::Invalid => {
                println!("Invalid season: {}", text.trim());
                return Ok(None);
            }
        }
    }

    if plan.event {
        match ask_number("Enter event ID (or leave empty for none)", "event ID")? {
            Some(value) => selections.event = value,
            None => return Ok(None),
        }
    }
    if plan.division {
        match ask_number("Enter division ID", "division ID")? {
            Some(value) => selections.division = value,
            None => return Ok(None),
        }
    }
    if plan.program {
        match ask_number("Enter program ID", "program ID")? {
            Some(value) => selections.program = value,
            None => return Ok(None),
        }
    }

    if plan.per_page && selections.season.is_some() {
        let default = DEFAULT_PER_PAGE.to_string();
        let text = ask("Results per page", None, Some(&default))?;
        match parse_number::<u32>(&text) {
            Answer::Valid(n) if n > 0 => selections.per_page = Some(n),
            Answer::Empty => {}
            _ => {
                println!("Invalid page size: {}", text.trim());
                return Ok(None);
            }
        }
    }

    Ok(Some(selections))
}

/// Run one interactive query: pick an endpoint, collect its parameters,
/// fetch, render and optionally export the rows to CSV.
pub fn run(api: &RobotEventsClient) -> Result<()> {
    let completer = WordCompleter::new(endpoints::names());
    let choice = ask("What would you like to query?", Some(&completer), None)?;
    let endpoint = match choose_endpoint(&choice) {
        Some(endpoint) => endpoint,
        None => {
            println!("Invalid endpoint: {}", choice.trim());
            return Ok(());
        }
    };

    let selections = match collect(PromptPlan::for_endpoint(endpoint))? {
        Some(selections) => selections,
        None => return Ok(()),
    };
    let (req, ignored) = bind(endpoint, &selections);
    debug!(?req, "planned request");
    for answer in ignored {
        warn!(endpoint = endpoint.name, answer, "answer not used by this endpoint");
        println!("Note: {} is not used by {} and was ignored.", answer, endpoint.name);
    }

    // `indicatif` spinner while the blocking request runs.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Fetching {}...", endpoint.name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = api.fetch_request(&req);
    spinner.finish_and_clear();

    let value = match result? {
        Some(value) => value,
        None => {
            println!("No results for {}.", endpoint.name);
            return Ok(());
        }
    };

    println!("\nResults for {}:", endpoint.name);
    let renderer = Renderer::for_stdout();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let shape = renderer.render(&mut out, &endpoint.title(), &value)?;
    out.flush()?;
    drop(out);

    if let Shape::Table(rows) = shape {
        offer_csv(endpoint, rows)?;
    }
    Ok(())
}

fn offer_csv(endpoint: &Endpoint, rows: &[serde_json::Value]) -> Result<()> {
    let wanted = Confirm::new()
        .with_prompt(format!("Export all {} rows to CSV?", rows.len()))
        .default(false)
        .interact()?;
    if !wanted {
        return Ok(());
    }
    let default = format!("{}.csv", endpoint.name);
    let path = PathBuf::from(ask("CSV file path", None, Some(&default))?.trim());
    let written = export_csv(rows, &path).with_context(|| format!("Writing {}", path.display()))?;
    println!("Wrote {} rows to {}", written, path.display());
    Ok(())
}
