//! Replaying scripted form sessions.
//!
//! A script is JSON lines, one host event per line. Blank lines and lines
//! starting with `#` are skipped.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};
use veriform_core::{FormDefinition, FormError, FormSchema, FormState, FormValues};

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The user changed a field.
    Change {
        field: String,
        value: serde_json::Value,
    },
    /// The user left a field.
    Blur { field: String },
    /// The user pressed submit.
    Submit,
    /// The user reset the form.
    Reset,
}

/// Parses a session script into `(line number, event)` pairs.
pub fn parse_script(script: &str) -> Result<Vec<(usize, SessionEvent)>> {
    script
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            let event: SessionEvent = serde_json::from_str(line)
                .with_context(|| format!("line {number}: invalid event"))?;
            Ok((number, event))
        })
        .collect()
}

/// Counts of what happened during a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub attempts: u32,
    pub submissions: usize,
}

/// Drives a [`FormState`] through a session the way a UI host would.
pub struct Session<'a, W: Write> {
    schema: FormSchema,
    state: FormState,
    out: &'a mut W,
    snapshots: bool,
    summary: ReplaySummary,
}

impl<'a, W: Write> Session<'a, W> {
    /// Starts a session from a definition's initial values.
    pub fn start(definition: &FormDefinition, out: &'a mut W, snapshots: bool) -> Result<Self> {
        let schema = definition.to_schema()?;
        let state = FormState::initialize(&schema, definition.initial_values())?;
        Ok(Self {
            schema,
            state,
            out,
            snapshots,
            summary: ReplaySummary::default(),
        })
    }

    /// Returns the current form state.
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Applies one event.
    pub fn apply(&mut self, event: SessionEvent) -> Result<()> {
        let state = self.state.clone();
        self.state = match event {
            SessionEvent::Change { field, value } => {
                let kind = self
                    .schema
                    .field(&field)
                    .ok_or_else(|| FormError::UnknownField(field.clone()))?
                    .kind;
                state.set_value(&self.schema, &field, kind.cast(&value))?
            }
            SessionEvent::Blur { field } => state.set_touched(&self.schema, &field)?,
            SessionEvent::Submit => self.submit(state)?,
            SessionEvent::Reset => {
                debug!("resetting form");
                state.reset(&self.schema)?
            }
        };
        self.summary.events += 1;

        if self.snapshots {
            writeln!(self.out, "{}", serde_json::to_string(&self.state)?)?;
        }
        Ok(())
    }

    fn submit(&mut self, state: FormState) -> Result<FormState> {
        let mut submitted: Option<FormValues> = None;
        let state = state.submit(&self.schema, |values| submitted = Some(values.clone()));
        self.summary.attempts = self.summary.attempts.saturating_add(1);

        if let Some(values) = submitted {
            self.summary.submissions += 1;
            info!(fields = values.len(), "submission accepted");
            let json: serde_json::Map<String, serde_json::Value> = values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect();
            writeln!(self.out, "Form submitted: {}", serde_json::Value::Object(json))?;
            writeln!(self.out, "Form submitted successfully!")?;
        } else {
            writeln!(self.out, "Submit rejected:")?;
            for field in self.schema.fields() {
                if let Some(error) = state.visible_error(&field.name) {
                    writeln!(self.out, "  {}: {error}", field.display_name())?;
                }
            }
        }
        Ok(state)
    }

    /// Applies every event in order, stopping at the first misuse error.
    pub fn replay(mut self, events: Vec<(usize, SessionEvent)>) -> Result<ReplaySummary> {
        for (line, event) in events {
            self.apply(event)
                .with_context(|| format!("line {line}: event rejected"))?;
        }
        Ok(self.summary)
    }
}
