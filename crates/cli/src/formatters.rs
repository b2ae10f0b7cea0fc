//! Output formatters for CLI commands.
//!
//! Provides two output formats: human-readable text and JSON. JSON output of
//! `feed` is one object per line so it can be streamed.

use anyhow::Result;
use clap::ValueEnum;
use keychord_core::{
    Binding, Context, Invocation, KeySequence, KeyToken, KeymapSummary, Outcome,
};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One fed key and what the resolver made of it.
#[derive(Debug, Serialize)]
pub struct FedKey<'a> {
    pub key: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<&'a Invocation>,
}

impl<'a> FedKey<'a> {
    pub fn new(token: KeyToken, outcome: &'a Outcome) -> Self {
        let dispatch = outcome.dispatch();
        Self {
            key: token.to_string(),
            outcome: outcome.label(),
            reason: match outcome {
                Outcome::Aborted(reason) => Some(reason.to_string()),
                _ => None,
            },
            action: dispatch.map(|d| d.action.name()),
            invocation: dispatch.map(|d| &d.invocation),
        }
    }
}

pub fn format_fed_key(fed: &FedKey<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(fed)?),
        OutputFormat::Text => {
            let mut line = format!("{}\t{}", fed.key, fed.outcome);
            if let Some(reason) = &fed.reason {
                line.push_str(&format!(" ({reason})"));
            }
            if let (Some(action), Some(invocation)) = (fed.action, fed.invocation) {
                line.push_str(&format!(" {action} keys={}", invocation.matched_keys));
                if let Some(count) = invocation.repeat_count {
                    line.push_str(&format!(" count={count}"));
                }
                if let Some(direction) = &invocation.direction {
                    line.push_str(&format!(" direction=[{direction}]"));
                }
                if !invocation.args.is_empty() {
                    line.push_str(&format!(" args={}", invocation.args.join(",")));
                }
            }
            Ok(line)
        }
    }
}

/// A key sequence and what it is bound to, rendered for output.
#[derive(Debug, Serialize)]
pub struct Entry {
    pub keys: String,
    pub target: String,
}

impl Entry {
    fn new(keys: &KeySequence, target: impl ToString) -> Self {
        Self {
            keys: keys.to_string(),
            target: target.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContextListing {
    pub name: String,
    pub counts: bool,
    pub bindings: Vec<Entry>,
    pub directions: Vec<Entry>,
    pub hints: Vec<Entry>,
}

impl ContextListing {
    pub fn new(context: &Context) -> Self {
        Self {
            name: context.name().to_string(),
            counts: context.counts(),
            bindings: context
                .bindings()
                .entries()
                .into_iter()
                .map(|(keys, binding)| Entry::new(&keys, binding))
                .collect(),
            directions: context
                .directions()
                .entries()
                .into_iter()
                .map(|(keys, entry)| Entry::new(&keys, entry))
                .collect(),
            hints: context
                .bindings()
                .hints()
                .into_iter()
                .map(|(keys, binding)| Entry::new(&keys, binding))
                .collect(),
        }
    }
}

pub fn format_listings(listings: &[ContextListing], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(listings)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for listing in listings {
                out.push_str(&format!("[{}]", listing.name));
                if !listing.counts {
                    out.push_str(" (digits are keys)");
                }
                out.push('\n');
                for (title, entries) in [
                    ("bindings", &listing.bindings),
                    ("directions", &listing.directions),
                    ("hints", &listing.hints),
                ] {
                    if entries.is_empty() {
                        continue;
                    }
                    out.push_str(&format!("  {title}:\n"));
                    for entry in entries {
                        out.push_str(&format!("    {:<12} {}\n", entry.keys, entry.target));
                    }
                }
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HintReport {
    pub context: String,
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub continuations: Vec<Entry>,
}

impl HintReport {
    pub fn new(
        context: &str,
        prefix: &KeySequence,
        hint: Option<&Binding>,
        continuations: Vec<(KeyToken, Option<&Binding>)>,
    ) -> Self {
        Self {
            context: context.to_string(),
            prefix: prefix.to_string(),
            hint: hint.map(ToString::to_string),
            continuations: continuations
                .into_iter()
                .map(|(token, binding)| Entry {
                    keys: token.to_string(),
                    target: binding.map_or_else(|| "...".to_string(), ToString::to_string),
                })
                .collect(),
        }
    }
}

pub fn format_hints(report: &HintReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            let mut out = String::new();
            if let Some(hint) = &report.hint {
                out.push_str(&format!("hint: {hint}\n"));
            }
            if report.continuations.is_empty() {
                out.push_str(&format!(
                    "No keys continue '{}' in context '{}'\n",
                    report.prefix, report.context
                ));
            }
            for entry in &report.continuations {
                out.push_str(&format!("{}{}\t{}\n", report.prefix, entry.keys, entry.target));
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub source: String,
    #[serde(flatten)]
    pub summary: KeymapSummary,
}

pub fn format_check(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            let s = &report.summary;
            Ok(format!(
                "Keymap OK ({}): {} contexts, {} bindings, {} directions, {} aliases, {} removed\n",
                report.source, s.contexts, s.bindings, s.directions, s.aliases, s.removed
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use keychord_core::{AbortReason, ActionRef, Direction, Dispatch, parse_key};

    fn dispatched() -> Outcome {
        let noop = |_: &Invocation| -> anyhow::Result<()> { Ok(()) };
        Outcome::Dispatched(Dispatch {
            action: ActionRef::new("fm.cut", Arc::new(noop)),
            invocation: Invocation {
                repeat_count: Some(5),
                direction: Some(Direction::down(3).absolute()),
                matched_keys: "dgg".to_string(),
                args: vec![],
            },
        })
    }

    #[test]
    fn test_text_dispatch_line() {
        let outcome = dispatched();
        let fed = FedKey::new(parse_key("g").unwrap(), &outcome);
        let line = format_fed_key(&fed, OutputFormat::Text).unwrap();
        assert_eq!(
            line,
            "g\tdispatched fm.cut keys=dgg count=5 direction=[down=3 absolute]"
        );
    }

    #[test]
    fn test_text_abort_line() {
        let outcome = Outcome::Aborted(AbortReason::NoBinding {
            keys: "zx".to_string(),
        });
        let fed = FedKey::new(parse_key("x").unwrap(), &outcome);
        let line = format_fed_key(&fed, OutputFormat::Text).unwrap();
        assert_eq!(line, "x\taborted (no binding for 'zx')");
    }

    #[test]
    fn test_json_dispatch_line() {
        let outcome = dispatched();
        let fed = FedKey::new(parse_key("g").unwrap(), &outcome);
        let line = format_fed_key(&fed, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["outcome"], "dispatched");
        assert_eq!(value["action"], "fm.cut");
        assert_eq!(value["invocation"]["repeat_count"], 5);
        assert_eq!(value["invocation"]["direction"]["down"], 3);
        assert!(value.get("reason").is_none());
    }

    #[test]
    fn test_json_waiting_line_is_minimal() {
        let outcome = Outcome::Waiting;
        let fed = FedKey::new(parse_key("<C-x>").unwrap(), &outcome);
        let line = format_fed_key(&fed, OutputFormat::Json).unwrap();
        assert_eq!(line, r#"{"key":"<C-x>","outcome":"waiting"}"#);
    }

    #[test]
    fn test_check_text() {
        let report = CheckReport {
            source: "built-in".to_string(),
            summary: KeymapSummary {
                contexts: 2,
                bindings: 10,
                directions: 3,
                aliases: 0,
                removed: 1,
            },
        };
        let text = format_check(&report, OutputFormat::Text).unwrap();
        assert!(text.starts_with("Keymap OK (built-in): 2 contexts, 10 bindings"));
    }
}
