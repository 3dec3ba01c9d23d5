use std::time::{Duration, Instant};

use strum_macros::Display;

use crate::clipboard::Clipboard;
use crate::debug;
use crate::engine::Engine;
use crate::options::Options;
use crate::outcome::{Failure, Outcome};
use crate::stats::Stats;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    /// No input
    Idle,
    /// Valid input, awaiting or holding a result
    Ready,
    /// The last transform attempt failed
    Errored,
}

/// State of one tool instance: input, options, last result and the transient
/// "copied" indicator.
///
/// A failed run keeps the previous successful output for display.
///
/// # Examples
///
/// ```
/// use devutils::engine::Engine;
/// use devutils::session::{ToolSession, ToolState};
///
/// let engine = Engine::new();
/// let mut session = ToolSession::new(&engine, "url-encode");
/// session.set_input("a b");
/// assert_eq!(session.state(), ToolState::Ready);
/// session.trigger(&engine);
/// assert_eq!(session.output(), Some("a%20b"));
/// ```
#[derive(Debug, Clone)]
pub struct ToolSession {
    operation: String,
    input: String,
    options: Options,
    state: ToolState,
    last_outcome: Option<Outcome>,
    last_success: Option<(String, Stats)>,
    copied_at: Option<Instant>,
    copied_reset: Duration,
}

impl ToolSession {
    /// New session for `operation`, starting from the engine's configured
    /// defaults for it
    pub fn new(engine: &Engine, operation: &str) -> Self {
        ToolSession {
            operation: operation.to_string(),
            input: String::new(),
            options: engine.defaults_for(operation),
            state: ToolState::Idle,
            last_outcome: None,
            last_success: None,
            copied_at: None,
            copied_reset: Duration::from_millis(engine.config().session.copied_reset_ms),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Last successful output, kept across failed runs
    pub fn output(&self) -> Option<&str> {
        self.last_success.as_ref().map(|(output, _)| output.as_str())
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.last_success.as_ref().map(|(_, stats)| stats)
    }

    /// Failure of the last run, cleared by the next success
    pub fn failure(&self) -> Option<&Failure> {
        self.last_outcome.as_ref().and_then(Outcome::failure)
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Records a user edit of the input
    pub fn set_input<S: Into<String>>(&mut self, input: S) {
        self.input = input.into();
        self.state = if self.input.is_empty() {
            ToolState::Idle
        } else {
            ToolState::Ready
        };
    }

    /// Clears input and results, returning to `Idle`
    pub fn clear(&mut self) {
        self.input.clear();
        self.last_outcome = None;
        self.last_success = None;
        self.copied_at = None;
        self.state = ToolState::Idle;
    }

    /// Runs the operation over the current input. Success moves to `Ready`,
    /// failure to `Errored`. Without input, a tool that reads its input stays
    /// `Idle` and keeps its previous output.
    pub fn trigger(&mut self, engine: &Engine) -> &Outcome {
        let reads_input = engine
            .registry()
            .get(&self.operation)
            .map_or(false, |transform| transform.consumes_input());
        if reads_input && self.input.is_empty() {
            debug!("{}: no input, staying idle", self.operation);
            self.state = ToolState::Idle;
            return self.last_outcome.insert(Outcome::empty());
        }

        let outcome = engine.run(&self.operation, &self.input, &self.options);
        match &outcome {
            Outcome::Success { output, stats } => {
                self.last_success = Some((output.clone(), stats.clone()));
                self.state = ToolState::Ready;
            }
            Outcome::Failure(_) => self.state = ToolState::Errored,
        }
        self.last_outcome.insert(outcome)
    }

    /// Copies the last successful output. Returns false, and copies nothing,
    /// when there is no successful output yet.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        match &self.last_success {
            Some((output, _)) if !output.is_empty() => {
                clipboard.write_text(output);
                self.copied_at = Some(now);
                true
            }
            _ => {
                debug!("{}: nothing to copy", self.operation);
                false
            }
        }
    }

    /// Whether the "copied" indicator is still shown at `now`
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.copied_reset)
    }
}
