//! Terminal reporter for assay runs
//!
//! Semantic colors and icons with an ASCII fallback, capability
//! detection (tty, NO_COLOR, TERM=dumb, unicode locale), verbosity
//! gating, and an NDJSON event mode for CI consumers.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;

use crate::assess::{Outcome, RunReport, ScenarioResult};
use crate::config::{ConfigWarning, Verbosity};

/// Semantic colors for assay output
pub mod colors {
    use crossterm::style::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

/// Icons used when the terminal supports unicode
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PENDING: &str = "○";
}

/// ASCII fallbacks for dumb terminals and CI logs
pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PENDING: &str = "[ ]";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub supports_color: bool,
    pub supports_unicode: bool,
}

pub fn detect_capabilities() -> TerminalCapabilities {
    detect_capabilities_impl(|key| std::env::var(key).ok(), io::stdout().is_terminal())
}

fn detect_capabilities_impl(
    get_env: impl Fn(&str) -> Option<String>,
    is_tty: bool,
) -> TerminalCapabilities {
    let term = get_env("TERM").unwrap_or_default();
    let term_is_dumb = term.eq_ignore_ascii_case("dumb");
    let no_color = get_env("NO_COLOR").is_some();

    TerminalCapabilities {
        supports_color: is_tty && !term_is_dumb && !no_color,
        supports_unicode: !term_is_dumb && unicode_locale(&get_env),
    }
}

fn unicode_locale(get_env: &impl Fn(&str) -> Option<String>) -> bool {
    const KEYS: &[&str] = &["LC_ALL", "LC_CTYPE", "LANG"];
    for k in KEYS {
        if let Some(val) = get_env(k) {
            let v = val.to_lowercase();
            if v.contains("utf-8") || v.contains("utf8") {
                return true;
            }
        }
    }

    // Default to true on modern systems unless explicitly "dumb".
    true
}

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Styled, verbosity-gated reporter for scenario runs
pub struct Reporter {
    verbosity: Verbosity,
    json: bool,
    caps: TerminalCapabilities,
}

impl Reporter {
    pub fn new(verbosity: Verbosity, json: bool) -> Self {
        Self {
            verbosity,
            json,
            caps: detect_capabilities(),
        }
    }

    /// Override detected capabilities (tests, forced-plain output)
    pub fn with_capabilities(mut self, caps: TerminalCapabilities) -> Self {
        self.caps = caps;
        self
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.caps.supports_color {
            format!("{}", text.with(color))
        } else {
            text.to_string()
        }
    }

    fn icon(&self, unicode: &'static str, ascii: &'static str) -> &'static str {
        if self.caps.supports_unicode {
            unicode
        } else {
            ascii
        }
    }

    /// Progress line, shown at normal verbosity and above
    pub fn info(&self, message: &str) {
        if self.json || self.verbosity < Verbosity::Normal {
            return;
        }
        println!("{}", message);
    }

    /// Detail line, shown at verbose and above
    pub fn verbose(&self, message: &str) {
        if self.json || self.verbosity < Verbosity::Verbose {
            return;
        }
        println!("{}", self.paint(message, colors::DIM));
    }

    /// Non-fatal warning, always shown on stderr
    pub fn warning(&self, message: &str) {
        let icon = self.icon(icons::WARNING, icons_ascii::WARNING);
        eprintln!("{} {}", self.paint(icon, colors::WARNING), message);
    }

    /// Fatal error, always shown on stderr
    pub fn error(&self, message: &str) {
        let icon = self.icon(icons::ERROR, icons_ascii::ERROR);
        eprintln!("{} {}", self.paint(icon, colors::ERROR), message);
    }

    /// Unknown-config-key warnings collected by the loader
    pub fn config_warnings(&self, warnings: &[ConfigWarning]) {
        for w in warnings {
            match w.line {
                Some(line) => self.warning(&format!(
                    "unknown config key '{}' in {}:{}",
                    w.key,
                    w.file.display(),
                    line
                )),
                None => self.warning(&format!(
                    "unknown config key '{}' in {}",
                    w.key,
                    w.file.display()
                )),
            }
        }
    }

    /// Announce a scenario before its first command runs
    pub fn scenario_started(&self, name: &str) {
        if self.json {
            let _ = emit(serde_json::json!({ "event": "start", "scenario": name }));
            return;
        }
        if self.verbosity >= Verbosity::Verbose {
            let icon = self.icon(icons::PENDING, icons_ascii::PENDING);
            println!("{} {}", self.paint(icon, colors::INFO), name);
        }
    }

    /// Print one scenario outcome
    pub fn scenario_result(&self, result: &ScenarioResult) {
        if self.json {
            let _ = emit(serde_json::json!({
                "event": "scenario",
                "name": result.name,
                "outcome": result.outcome,
                "failure": result.failure,
            }));
            return;
        }

        match result.outcome {
            Outcome::Pass => {
                if self.verbosity >= Verbosity::Normal {
                    let icon = self.icon(icons::SUCCESS, icons_ascii::SUCCESS);
                    println!("{} {}", self.paint(icon, colors::SUCCESS), result.name);
                }
            }
            Outcome::Fail => {
                let icon = self.icon(icons::ERROR, icons_ascii::ERROR);
                println!("{} {}", self.paint(icon, colors::ERROR), result.name);
                if let Some(failure) = &result.failure {
                    for line in failure.lines() {
                        println!("    {}", line);
                    }
                }
            }
        }
    }

    /// Print the suite summary (or the final report object in json mode)
    pub fn summary(&self, report: &RunReport) {
        if self.json {
            let _ = emit(serde_json::json!({ "event": "report", "report": report }));
            return;
        }

        let failed = report
            .scenarios
            .iter()
            .filter(|s| s.outcome == Outcome::Fail)
            .count();
        let total = report.scenarios.len();

        if failed == 0 {
            self.info(&format!(
                "{} {} scenario(s) passed",
                self.paint(
                    self.icon(icons::SUCCESS, icons_ascii::SUCCESS),
                    colors::SUCCESS
                ),
                total
            ));
        } else {
            println!(
                "{} {}/{} scenario(s) failed",
                self.paint(self.icon(icons::ERROR, icons_ascii::ERROR), colors::ERROR),
                failed,
                total
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn caps(env: &[(&str, &str)], is_tty: bool) -> TerminalCapabilities {
        let map: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        detect_capabilities_impl(|k| map.get(k).cloned(), is_tty)
    }

    #[test]
    fn detect_respects_no_color() {
        let c = caps(&[("NO_COLOR", "1"), ("TERM", "xterm-256color")], true);
        assert!(!c.supports_color);
    }

    #[test]
    fn detect_requires_a_tty_for_color() {
        let c = caps(&[("TERM", "xterm-256color")], false);
        assert!(!c.supports_color);
    }

    #[test]
    fn detect_term_dumb_disables_enhancements() {
        let c = caps(&[("TERM", "dumb")], true);
        assert!(!c.supports_color);
        assert!(!c.supports_unicode);
    }

    #[test]
    fn detect_unicode_from_locale() {
        let c = caps(&[("TERM", "xterm"), ("LANG", "en_US.UTF-8")], true);
        assert!(c.supports_unicode);
    }

    #[test]
    fn write_event_is_one_line_per_object() {
        let mut out = Vec::new();
        write_event(&mut out, &serde_json::json!({ "event": "start" })).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"event\":\"start\"}\n");
    }

    #[test]
    fn reporter_falls_back_to_plain_ascii() {
        let reporter = Reporter::new(Verbosity::Normal, false).with_capabilities(
            TerminalCapabilities {
                supports_color: false,
                supports_unicode: false,
            },
        );
        assert_eq!(reporter.paint("text", colors::ERROR), "text");
        assert_eq!(
            reporter.icon(icons::SUCCESS, icons_ascii::SUCCESS),
            icons_ascii::SUCCESS
        );
    }

    #[test]
    fn reporter_uses_unicode_icons_when_supported() {
        let reporter = Reporter::new(Verbosity::Normal, false).with_capabilities(
            TerminalCapabilities {
                supports_color: true,
                supports_unicode: true,
            },
        );
        assert_eq!(
            reporter.icon(icons::SUCCESS, icons_ascii::SUCCESS),
            icons::SUCCESS
        );
    }
}
