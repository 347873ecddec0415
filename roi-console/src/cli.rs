//! Command-line flags and the line grammar read from stdin.

use clap::{Parser, ValueEnum};
use form_shell::Command;
use scenario_core::FieldName;

#[derive(Parser, Debug)]
#[command(name = "roi-console")]
#[command(author, version, about = "Drive the ROI scenario form from a terminal")]
pub struct Cli {
    /// Base URL of the scenario service
    #[arg(long, env = scenario_client::BASE_URL_ENV, default_value = scenario_client::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log filter directives, e.g. `info` or `form_shell=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

pub const HELP: &str = "\
commands:
  set <field> <value>   edit a form field
  email <address>       set the report email
  select [id]           choose a saved scenario (no id: placeholder)
  simulate | save | load | refresh | report
  show                  print the form
  help | quit";

/// One parsed line of console input.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Set(FieldName, String),
    Email(String),
    Select(String),
    Run(Command),
    Show,
    Help,
    Quit,
    Blank,
}

pub fn parse_line(line: &str) -> Result<Line, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "" => Ok(Line::Blank),
        "set" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (rest, ""),
            };
            if name.is_empty() {
                return Err("usage: set <field> <value>".to_string());
            }
            let field = name
                .parse::<FieldName>()
                .map_err(|_| format!("unknown field: {name}"))?;
            Ok(Line::Set(field, value.to_string()))
        }
        "email" => Ok(Line::Email(rest.to_string())),
        "select" => Ok(Line::Select(rest.to_string())),
        "show" => Ok(Line::Show),
        "help" | "?" => Ok(Line::Help),
        "quit" | "exit" => Ok(Line::Quit),
        other => Command::from_name(other)
            .map(Line::Run)
            .ok_or_else(|| format!("unknown command: {other} (try `help`)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            parse_line("set scenario_name  Q3 pilot ").unwrap(),
            Line::Set(FieldName::ScenarioName, "Q3 pilot".to_string())
        );
        assert_eq!(
            parse_line("set hourly_wage").unwrap(),
            Line::Set(FieldName::HourlyWage, String::new())
        );
    }

    #[test]
    fn set_rejects_unknown_field() {
        assert_eq!(parse_line("set wage 3").unwrap_err(), "unknown field: wage");
        assert!(parse_line("set").is_err());
    }

    #[test]
    fn commands_and_selection() {
        assert_eq!(parse_line("simulate").unwrap(), Line::Run(Command::Simulate));
        assert_eq!(parse_line("report").unwrap(), Line::Run(Command::RequestReport));
        assert_eq!(parse_line("select 7").unwrap(), Line::Select("7".to_string()));
        assert_eq!(parse_line("select").unwrap(), Line::Select(String::new()));
        assert_eq!(parse_line("email a@b.co").unwrap(), Line::Email("a@b.co".to_string()));
        assert_eq!(parse_line("   ").unwrap(), Line::Blank);
        assert_eq!(parse_line("exit").unwrap(), Line::Quit);
        assert!(parse_line("launch").is_err());
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "roi-console",
            "--base-url",
            "http://roi.test:8080",
            "--log-format",
            "json",
            "--log-filter",
            "debug",
        ]);
        assert_eq!(cli.base_url, "http://roi.test:8080");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_filter, "debug");
    }
}
