use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::Path;

use draftkit::chooser::{ChooserConfig, ChooserOutcome, ChooserSession};
use draftkit::cli::{CliArgs, Command, DocumentArgs};
use draftkit::commands::Cmd;
use draftkit::config::EditorConfig;
use draftkit::length;
use draftkit::links::{classify, validate};
use draftkit::messages::EditorMsg;
use draftkit::model::{EntityData, EntityKey, TextModel};
use draftkit::selection_text::extract_text;
use draftkit::session::EditorSession;
use draftkit::translate::NoTranslation;
use draftkit::update::update;

/// Chooser host for the command line: the payload is already known, so
/// opening and closing are only logged.
struct LoggingChooser;

impl ChooserSession for LoggingChooser {
    fn open(&mut self, config: &ChooserConfig) {
        tracing::info!(chooser = ?config.target, params = ?config.params, "chooser opened");
    }

    fn close(&mut self) {
        tracing::info!("chooser closed");
    }
}

fn read_document(args: &DocumentArgs) -> Result<TextModel> {
    let json = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read document from stdin")?;
            buf
        }
    };
    TextModel::from_json(&json).context("Invalid raw document")
}

fn load_config(path: Option<&Path>) -> EditorConfig {
    match path {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load(),
    }
}

/// Feed messages through a session, failing on the first rejected one
fn drive(session: &mut EditorSession, msgs: Vec<EditorMsg>) -> Result<()> {
    for msg in msgs {
        if let Some(Cmd::ShowError(message)) = update(session, msg) {
            bail!(message);
        }
    }
    Ok(())
}

fn run(command: Command, config: EditorConfig) -> Result<()> {
    match command {
        Command::Validate { text, schemes } => {
            let schemes = if schemes.is_empty() {
                config.link_schemes
            } else {
                schemes
            };
            match validate(&text, &schemes) {
                Some(url) => println!("{}", url),
                None => bail!("Not a valid link: {}", text),
            }
        }

        Command::Classify { data } => {
            let data: EntityData =
                serde_json::from_str(&data).context("Entity data must be a JSON object")?;
            let decoration = classify(&data, &NoTranslation);
            println!("{}", serde_json::to_string_pretty(&decoration)?);
        }

        Command::Count(document) => {
            let model = read_document(&document)?;
            let status = config.length_limit().measure(&model);
            match status.max {
                Some(max) => println!("{}/{}", status.count, max),
                None => println!("{}", status.count),
            }
            if status.is_over() {
                tracing::warn!(count = status.count, max = ?status.max, "document over length limit");
            }
        }

        Command::Flatten(document) => {
            let model = read_document(&document)?;
            println!("{}", length::flatten(&model));
        }

        Command::Extract {
            document,
            selection,
        } => {
            let model = read_document(&document)?;
            let selection = selection.resolve(&model)?;
            println!("{}", extract_text(&model, &selection)?);
        }

        Command::Paste {
            text,
            document,
            selection,
        } => {
            let model = read_document(&document)?;
            let selection = selection.resolve(&model)?;
            let mut session = EditorSession::new(model, config, Box::new(LoggingChooser));
            drive(
                &mut session,
                vec![EditorMsg::SetSelection(selection), EditorMsg::Paste(text)],
            )?;
            println!("{}", session.model.to_json_pretty()?);
        }

        Command::Apply {
            entity_type,
            payload,
            existing,
            document,
            selection,
        } => {
            let payload: EntityData =
                serde_json::from_str(&payload).context("Payload must be a JSON object")?;
            let model = read_document(&document)?;
            let selection = selection.resolve(&model)?;
            let mut session = EditorSession::new(model, config, Box::new(LoggingChooser));
            drive(
                &mut session,
                vec![
                    EditorMsg::SetSelection(selection),
                    EditorMsg::OpenChooser {
                        entity_type,
                        existing: existing.map(EntityKey::new),
                    },
                    EditorMsg::ChooserResolved(ChooserOutcome::chosen(payload)),
                ],
            )?;
            tracing::debug!(length = ?session.length_status(), "applied entity");
            println!("{}", session.model.to_json_pretty()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    draftkit::tracing::init();

    let config = load_config(args.config.as_deref());
    run(args.command, config)
}
