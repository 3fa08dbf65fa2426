//! veriform CLI
//!
//! Headless host for validated form state: replays scripted sessions and
//! validates value sets against a form definition.

mod session;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use veriform_core::{FormDefinition, ValidationErrors};

use crate::session::{parse_script, Session};

/// Built-in tutorial form: text, select, terms checkbox, radio, date-time, email and multi-select.
const TUTORIAL_DEFINITION: &str = include_str!("../forms/tutorial.json");

/// Validated form sessions from the command line.
#[derive(Parser)]
#[command(name = "veriform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Form definition (JSON). Defaults to the built-in tutorial form.
    #[arg(short, long, env = "VERIFORM_DEFINITION")]
    definition: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted session of change, blur, submit and reset events.
    Run {
        /// Session script (JSON lines).
        #[arg(short, long)]
        script: PathBuf,

        /// Print a state snapshot after every event.
        #[arg(long)]
        snapshots: bool,
    },

    /// Validate a JSON object of field values once.
    Validate {
        /// Values file (JSON object keyed by field name).
        #[arg(long)]
        values: PathBuf,
    },

    /// Print the active form definition.
    Show,
}

fn load_definition(path: Option<&Path>) -> anyhow::Result<FormDefinition> {
    match path {
        Some(path) => FormDefinition::from_path(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(FormDefinition::from_json(TUTORIAL_DEFINITION)?),
    }
}

/// Validates a JSON object of values, filling omitted fields from the
/// definition's initial values.
fn validate_values(
    definition: &FormDefinition,
    path: &Path,
) -> anyhow::Result<ValidationErrors> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&raw)?;
    let raw = raw
        .as_object()
        .context("values file must contain a JSON object")?;

    let schema = definition.to_schema()?;
    let mut values = definition.initial_values();
    values.extend(definition.cast_values(raw)?);
    Ok(schema.validate_all(&values))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let definition = load_definition(cli.definition.as_deref())?;
    info!(
        form = definition.title.as_deref().unwrap_or("untitled"),
        fields = definition.fields.len(),
        "loaded form definition"
    );

    match cli.command {
        Commands::Run { script, snapshots } => {
            let script = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read {}", script.display()))?;
            let events = parse_script(&script)?;

            let mut stdout = std::io::stdout().lock();
            let summary = Session::start(&definition, &mut stdout, snapshots)?.replay(events)?;
            info!(
                events = summary.events,
                attempts = summary.attempts,
                submissions = summary.submissions,
                "session finished"
            );
        }

        Commands::Validate { values } => {
            let errors = validate_values(&definition, &values)?;
            if errors.is_empty() {
                println!("All {} fields are valid.", definition.fields.len());
            } else {
                print!("{errors}");
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Show => {
            println!("{}", definition.to_json()?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriform_core::{FieldKind, FormState};

    #[test]
    fn test_tutorial_definition() {
        let definition = load_definition(None).unwrap();
        let schema = definition.to_schema().unwrap();
        assert_eq!(
            schema.field_names().collect::<Vec<_>>(),
            vec!["text", "select", "checkbox", "radio", "datetime", "email", "multiSelect"]
        );
        assert_eq!(schema.field("multiSelect").unwrap().kind, FieldKind::Choices);

        let state = FormState::initialize(&schema, definition.initial_values()).unwrap();
        assert_eq!(state.error("text"), Some("Text field is required"));
        assert_eq!(state.error("select"), Some("Please select an option"));
        assert_eq!(state.error("checkbox"), Some("Please accept the terms"));
        assert_eq!(state.error("radio"), Some("Please select an option"));
        assert_eq!(state.error("datetime"), Some("Date and time are required"));
        assert_eq!(state.error("email"), Some("Email is required"));
        assert_eq!(state.error("multiSelect"), None);
    }

    #[test]
    fn test_tutorial_session_script() {
        let definition = load_definition(None).unwrap();
        let events = parse_script(include_str!("../forms/tutorial-session.jsonl")).unwrap();
        let mut out = Vec::new();
        let summary = Session::start(&definition, &mut out, false)
            .unwrap()
            .replay(events)
            .unwrap();
        assert_eq!(summary.attempts, 2);
        assert_eq!(summary.submissions, 1);

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("  Email: Enter a valid email\n"));
        assert!(output.ends_with("Form submitted successfully!\n"));
    }

    #[test]
    fn test_load_definition_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"fields": [{"name": "a", "kind": "text"}]}"#)
            .unwrap();
        let definition = load_definition(Some(file.path())).unwrap();
        assert_eq!(definition.fields.len(), 1);

        let err = load_definition(Some(Path::new("/nonexistent.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    fn values_file(json: &str) -> tempfile::NamedTempFile {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_values_merges_initial_values() {
        let definition = load_definition(None).unwrap();
        let file = values_file(
            r#"{"text": "hello", "select": "option1", "checkbox": true,
                "radio": "option2", "datetime": "2024-05-01T09:15",
                "email": "x@y.com"}"#,
        );
        let errors = validate_values(&definition, file.path()).unwrap();
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn test_validate_values_reports_errors() {
        let definition = load_definition(None).unwrap();
        let file = values_file(r#"{"text": "hello", "email": "abc", "datetime": "later"}"#);
        let errors = validate_values(&definition, file.path()).unwrap();
        assert_eq!(errors.get("text"), None);
        assert_eq!(errors.get("email"), Some("Enter a valid email"));
        assert_eq!(errors.get("datetime"), Some("Enter a valid date"));
        assert_eq!(errors.get("checkbox"), Some("Please accept the terms"));
        assert_eq!(errors.get("select"), Some("Please select an option"));
    }

    #[test]
    fn test_validate_values_rejects_bad_input() {
        let definition = load_definition(None).unwrap();

        let file = values_file(r#"{"phone": "123"}"#);
        let err = validate_values(&definition, file.path()).unwrap_err();
        assert!(err.to_string().contains("unknown field: phone"));

        let file = values_file("[1, 2]");
        let err = validate_values(&definition, file.path()).unwrap_err();
        assert!(err.to_string().contains("must contain a JSON object"));

        let err = validate_values(&definition, Path::new("/nonexistent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["veriform", "run", "--script", "s.jsonl", "--snapshots"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                snapshots: true,
                ..
            }
        ));
    }
}
