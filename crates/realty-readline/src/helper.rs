use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

const COMMANDS: [&str; 3] = ["/help", "/status", "/upload"];

/// REPL slash commands. Anything else typed at the prompt is a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Status,
    Upload(PathBuf),
    /// `/upload` without a path, or an unrecognised command.
    Invalid(String),
}

impl ReplCommand {
    /// Parses a trimmed input line; `None` means it is not a command.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        Some(match name {
            "help" => Self::Help,
            "status" => Self::Status,
            "upload" if !arg.is_empty() => Self::Upload(PathBuf::from(arg)),
            "upload" => Self::Invalid("usage: /upload <path-to-xlsx>".to_string()),
            other => Self::Invalid(format!("unknown command '/{other}', try /help")),
        })
    }
}

pub const HELP_TEXT: &str = "\
Type a locality question and press enter, e.g. 'Analyze Wakad' or 'Compare Ambegaon and Aundh'.
  /status          show the state of the current session
  /upload <path>   upload an Excel dataset to the analysis service
  /help            show this help
  quit | exit      leave";

/// CLI helper for rustyline that provides completion, highlighting, and hints
/// for slash commands.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn matching<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> {
        self.commands.iter().filter(move |cmd| cmd.starts_with(prefix))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates = self
                .matching(line)
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.matching(line)
                .find(|cmd| cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}
