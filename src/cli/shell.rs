//! Shell loop, dispatch, and the presentation adapter context.

use std::io::{self, BufRead, IsTerminal};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rustyline::{error::ReadlineError, DefaultEditor};
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    errors::TrackerError,
    ledger::Ledger,
    storage::JsonStorage,
    time::{Clock, SystemClock},
};

use super::{commands, output};

const PROMPT: &str = "finance> ";

/// How the shell receives input: a line editor for humans, plain stdin lines
/// for scripts and one-shot invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// User-facing error wrapper around core failures.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("exit requested")]
    ExitRequested,
}

impl From<dialoguer::Error> for CommandError {
    fn from(err: dialoguer::Error) -> Self {
        CommandError::Command(err.to_string())
    }
}

pub type CommandResult = Result<(), CommandError>;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One entry in the command table.
#[derive(Clone, Copy)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Owns the ledger and its collaborators for the lifetime of the process.
///
/// Every user action runs to completion on this single thread: mutate,
/// persist, recompute, render, then the next line is read.
pub struct ShellContext {
    pub mode: CliMode,
    pub ledger: Ledger,
    pub storage: JsonStorage,
    pub clock: SystemClock,
    pub theme: ColorfulTheme,
    commands: Vec<CommandDefinition>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, TrackerError> {
        let storage = JsonStorage::new_default()?;
        Ok(Self::with_storage(mode, storage))
    }

    pub fn with_storage(mode: CliMode, storage: JsonStorage) -> Self {
        let (ledger, warning) = storage.load_or_default();
        if let Some(err) = warning {
            output::warning(format!(
                "Could not read saved data ({err}); starting with an empty ledger."
            ));
        }
        Self {
            mode,
            ledger,
            storage,
            clock: SystemClock,
            theme: ColorfulTheme::default(),
            commands: commands::definitions(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }

    /// Mirrors the ledger to disk after a mutation. A failed write keeps the
    /// in-memory state authoritative and only surfaces a warning.
    pub fn persist(&self) {
        if let Err(err) = self.storage.save(&self.ledger) {
            output::warning(format!(
                "Could not save data: {err}. Changes remain in memory."
            ));
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = shell_words::split(line)
            .map_err(|err| CommandError::Input(format!("could not parse input: {err}")))?;
        let Some((command, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let name = command.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let handler = self
            .commands
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.handler);
        match handler {
            Some(handler) => match handler(self, &args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
            None => {
                self.suggest_command(&name);
                Ok(LoopControl::Continue)
            }
        }
    }

    fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let mut candidates: Vec<_> = self
            .commands
            .iter()
            .map(|def| (levenshtein(def.name, input), def.name))
            .collect();
        candidates.sort_by_key(|(distance, _)| *distance);
        if let Some((distance, best)) = candidates.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{best}`?"));
            }
        }
    }
}

/// Entry point: executes a single command when arguments are given,
/// otherwise starts a session reading commands line by line.
pub fn run(args: &[String]) -> Result<(), CommandError> {
    if args.is_empty() {
        return run_session();
    }
    let mut app = ShellContext::new(CliMode::Script)?;
    let line = shell_words::join(args);
    app.process_line(&line).map(|_| ())
}

fn run_session() -> Result<(), CommandError> {
    let interactive = io::stdin().is_terminal();
    let mode = if interactive {
        CliMode::Interactive
    } else {
        CliMode::Script
    };
    let mut app = ShellContext::new(mode)?;
    if interactive {
        output::section("Personal Finance Tracker");
        commands::render_overview(&app);
        output::info("Type `help` to see available commands.");
        run_interactive(&mut app)
    } else {
        run_script(&mut app)
    }
}

fn run_interactive(app: &mut ShellContext) -> Result<(), CommandError> {
    let mut editor =
        DefaultEditor::new().map_err(|err| CommandError::Command(err.to_string()))?;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);
                match app.process_line(trimmed) {
                    Ok(LoopControl::Exit) => break,
                    Ok(LoopControl::Continue) => {}
                    Err(err) => output::error(err),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                output::error(format!("Input error: {err}"));
                break;
            }
        }
    }
    Ok(())
}

fn run_script(app: &mut ShellContext) -> Result<(), CommandError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| CommandError::Command(err.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match app.process_line(trimmed) {
            Ok(LoopControl::Exit) => break,
            Ok(LoopControl::Continue) => {}
            Err(err) => output::error(err),
        }
    }
    Ok(())
}
