//! Host services: dialogs and the log sink
//!
//! `alert`, `confirm`, `prompt` and `log` directives talk to the outside
//! world only through the [`Host`] trait. [`ConsoleHost`] runs them over a
//! terminal; [`RecordingHost`] scripts the answers and records what was
//! shown, which is what tests use.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use tracing::warn;

/// The environment a document runs in.
pub trait Host {
    /// Show a message.
    fn alert(&mut self, message: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Ask for a line of input. `None` means the user cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// Write to the log sink.
    fn log(&mut self, message: &str);
}

// ═══════════════════════════════════════════════════════════════════════
// Console
// ═══════════════════════════════════════════════════════════════════════

/// A host that prints dialogs to a writer and reads answers from a reader.
#[derive(Debug)]
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    /// A host over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the host, returning its streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.output, "{}", line).and_then(|()| self.output.flush()) {
            warn!(error = %err, "host output failed");
        }
    }

    /// Read one line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!(error = %err, "host input failed");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Host for ConsoleHost<R, W> {
    fn alert(&mut self, message: &str) {
        self.write_line(&format!("[alert] {}", message));
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.write_line(&format!("[confirm] {} (y/n)", message));
        self.read_line().is_some_and(|answer| {
            matches!(
                answer.trim().to_ascii_lowercase().as_str(),
                "y" | "yes" | "ok" | "true"
            )
        })
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        if default.is_empty() {
            self.write_line(&format!("[prompt] {}", message));
        } else {
            self.write_line(&format!("[prompt] {} [{}]", message, default));
        }
        // An empty answer accepts the default
        self.read_line().map(|answer| {
            if answer.is_empty() {
                default.to_string()
            } else {
                answer
            }
        })
    }

    fn log(&mut self, message: &str) {
        self.write_line(message);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Recording
// ═══════════════════════════════════════════════════════════════════════

/// Something a [`RecordingHost`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// `alert(message)`
    Alert(String),
    /// `confirm(message)`
    Confirm(String),
    /// `prompt(message, default)`
    Prompt {
        /// The question
        message: String,
        /// The pre-filled answer
        default: String,
    },
    /// `log(message)`
    Log(String),
}

/// A host that records every request and answers from queues.
///
/// An empty confirm queue answers `false`; an empty prompt queue answers
/// with the default.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    /// Requests in the order they were made
    pub events: Vec<HostEvent>,
    confirms: VecDeque<bool>,
    prompts: VecDeque<Option<String>>,
}

impl RecordingHost {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next `confirm`.
    pub fn answer_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue the answer to the next `prompt`; `None` cancels it.
    pub fn answer_prompt(mut self, answer: Option<&str>) -> Self {
        self.prompts.push_back(answer.map(str::to_string));
        self
    }

    /// Messages passed to `log`, in order.
    pub fn logs(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Log(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Messages passed to `alert`, in order.
    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Alert(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn alert(&mut self, message: &str) {
        self.events.push(HostEvent::Alert(message.to_string()));
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.events.push(HostEvent::Confirm(message.to_string()));
        self.confirms.pop_front().unwrap_or(false)
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self.events.push(HostEvent::Prompt {
            message: message.to_string(),
            default: default.to_string(),
        });
        self.prompts
            .pop_front()
            .unwrap_or_else(|| Some(default.to_string()))
    }

    fn log(&mut self, message: &str) {
        self.events.push(HostEvent::Log(message.to_string()));
    }
}

impl<H: Host + ?Sized> Host for &mut H {
    fn alert(&mut self, message: &str) {
        (**self).alert(message)
    }

    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        (**self).prompt(message, default)
    }

    fn log(&mut self, message: &str) {
        (**self).log(message)
    }
}
