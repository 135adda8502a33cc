//! Command-line argument parsing
//!
//! Every subcommand that reads a document takes raw JSON from `--input`
//! or stdin. Selections are given as `BLOCK:OFFSET` points.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Selection, SelectionPoint, TextModel};

/// Entity editing for block-structured rich text
#[derive(Parser, Debug)]
#[command(
    name = "draftkit",
    version,
    about = "Entity editing for block-structured rich text"
)]
pub struct CliArgs {
    /// Config file to use instead of ~/.config/draftkit/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether text is a link and print its canonical url
    Validate {
        text: String,
        /// Allowed scheme (repeatable, defaults to the configured list)
        #[arg(long = "scheme", value_name = "SCHEME")]
        schemes: Vec<String>,
    },
    /// Classify link entity data given as JSON, e.g. '{"url": "tel:123"}'
    Classify { data: String },
    /// Print the character count of a document
    Count(DocumentArgs),
    /// Print the plain text used for length limits
    Flatten(DocumentArgs),
    /// Print the text covered by a selection
    Extract {
        #[command(flatten)]
        document: DocumentArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Paste text over a selection and print the resulting document
    Paste {
        text: String,
        #[command(flatten)]
        document: DocumentArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Apply a chooser payload for an entity type and print the resulting document
    Apply {
        /// Entity type, e.g. LINK or IMAGE
        #[arg(long = "type", value_name = "TYPE")]
        entity_type: String,
        /// Chooser payload as a JSON object
        #[arg(long, value_name = "JSON")]
        payload: String,
        /// Key of the entity being edited
        #[arg(long, value_name = "KEY")]
        existing: Option<String>,
        #[command(flatten)]
        document: DocumentArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Where to read the raw document from
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Raw document JSON file (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// A selection as two points
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Anchor point, BLOCK:OFFSET
    #[arg(long, value_name = "BLOCK:OFFSET", value_parser = parse_point)]
    pub at: SelectionPoint,

    /// Focus point, BLOCK:OFFSET (defaults to the anchor)
    #[arg(long, value_name = "BLOCK:OFFSET", value_parser = parse_point)]
    pub to: Option<SelectionPoint>,
}

impl SelectionArgs {
    /// Build a selection against `model`, marking it backward when the
    /// focus precedes the anchor in document order.
    pub fn resolve(&self, model: &TextModel) -> Result<Selection> {
        let anchor = &self.at;
        let focus = self.to.as_ref().unwrap_or(anchor);

        let anchor_pos = (model.index_of(&anchor.key)?, anchor.offset);
        let focus_pos = (model.index_of(&focus.key)?, focus.offset);

        let selection = Selection::new(
            anchor.key.clone(),
            anchor.offset,
            focus.key.clone(),
            focus.offset,
        );
        Ok(if focus_pos < anchor_pos {
            selection.backward()
        } else {
            selection
        })
    }
}

/// Parse `BLOCK:OFFSET`. The block key may itself contain colons.
pub fn parse_point(s: &str) -> std::result::Result<SelectionPoint, String> {
    let (key, offset) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected BLOCK:OFFSET, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing block key in '{}'", s));
    }
    let offset = offset
        .parse::<usize>()
        .map_err(|e| format!("invalid offset '{}': {}", offset, e))?;
    Ok(SelectionPoint::new(key, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn two_blocks() -> TextModel {
        TextModel::new(vec![Block::new("a", "hello"), Block::new("b", "world")]).unwrap()
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("a:3").unwrap(), SelectionPoint::new("a", 3));
        assert_eq!(
            parse_point("ns:key:12").unwrap(),
            SelectionPoint::new("ns:key", 12)
        );
        assert!(parse_point("a").is_err());
        assert!(parse_point(":3").is_err());
        assert!(parse_point("a:-1").is_err());
    }

    #[test]
    fn test_parse_paste_command() {
        let args = CliArgs::try_parse_from([
            "draftkit",
            "paste",
            "https://example.com",
            "--at",
            "a:0",
            "--to",
            "a:5",
            "-i",
            "doc.json",
        ])
        .unwrap();
        let Command::Paste {
            text,
            document,
            selection,
        } = args.command
        else {
            panic!("Expected paste command");
        };
        assert_eq!(text, "https://example.com");
        assert_eq!(document.input, Some(PathBuf::from("doc.json")));
        assert_eq!(selection.to, Some(SelectionPoint::new("a", 5)));
    }

    #[test]
    fn test_validate_schemes_repeatable() {
        let args = CliArgs::try_parse_from([
            "draftkit",
            "validate",
            "gopher://x",
            "--scheme",
            "gopher",
            "--scheme",
            "http",
        ])
        .unwrap();
        let Command::Validate { schemes, .. } = args.command else {
            panic!("Expected validate command");
        };
        assert_eq!(schemes, vec!["gopher", "http"]);
    }

    #[test]
    fn test_apply_requires_type_and_payload() {
        assert!(CliArgs::try_parse_from(["draftkit", "apply", "--at", "a:0"]).is_err());
    }

    #[test]
    fn test_selection_resolve_direction() {
        let model = two_blocks();
        let forward = SelectionArgs {
            at: SelectionPoint::new("a", 1),
            to: Some(SelectionPoint::new("b", 2)),
        };
        assert!(!forward.resolve(&model).unwrap().is_backward);

        let backward = SelectionArgs {
            at: SelectionPoint::new("b", 2),
            to: Some(SelectionPoint::new("a", 1)),
        };
        assert!(backward.resolve(&model).unwrap().is_backward);

        let caret = SelectionArgs {
            at: SelectionPoint::new("a", 4),
            to: None,
        };
        assert!(caret.resolve(&model).unwrap().is_collapsed());
    }

    #[test]
    fn test_selection_resolve_unknown_block() {
        let args = SelectionArgs {
            at: SelectionPoint::new("zzz", 0),
            to: None,
        };
        assert!(args.resolve(&two_blocks()).is_err());
    }
}
