use clap::ValueEnum;
use console::style;
use serde::Serialize;

use crate::error::{Result, SkillError, StructuredError};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a StructuredError,
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// Report a failed command on stderr in the requested format.
pub fn emit_error(err: &SkillError, format: OutputFormat) {
    let structured = err.to_structured();
    if format.is_machine_readable() {
        let payload = serde_json::to_string_pretty(&ErrorEnvelope { error: &structured })
            .unwrap_or_else(|_| format!("{{\"error\": {:?}}}", structured.message));
        eprintln!("{payload}");
    } else {
        eprintln!("{} {}", style(format!("error[{}]:", structured.code)).red().bold(), structured.message);
        eprintln!("  {} {}", style("hint:").dim(), structured.suggestion);
    }
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 14,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(String::new());
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        self.lines
            .push(format!("{:width$} {value}", style(key).dim(), width = self.key_width));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: &HumanLayout) {
    println!("{}", layout.build());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_machine_readable() {
        assert!(OutputFormat::Json.is_machine_readable());
        assert!(!OutputFormat::Human.is_machine_readable());
        assert_eq!(OutputFormat::default(), OutputFormat::Human);
    }

    #[test]
    fn layout_collects_lines() {
        let mut layout = HumanLayout::new();
        layout.kv("name", "Demo").bullet("SKILL.md").push_line("done");
        let text = layout.build();
        assert!(text.contains("Demo"));
        assert!(text.contains("- SKILL.md"));
        assert!(text.ends_with("done"));
    }

    #[test]
    fn error_envelope_wraps_structured_error() {
        let structured = SkillError::EmptyPackage("skills/t/x/v1/".into()).to_structured();
        let json = serde_json::to_value(ErrorEnvelope { error: &structured }).unwrap();
        assert_eq!(json["error"]["code"], "PACKAGE_EMPTY");
        assert_eq!(json["error"]["numeric_code"], 201);
    }
}
