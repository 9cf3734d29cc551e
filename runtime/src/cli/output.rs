//! Shared CLI output formatting with colors, symbols, and structured display.

use std::io::IsTerminal;
use std::sync::OnceLock;

/// Global output switches, set once from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFlags {
    pub quiet: bool,
    pub verbose: bool,
    pub json: bool,
    pub no_color: bool,
}

impl OutputFlags {
    /// Switches requested through `FAME_QUIET`, `FAME_VERBOSE`, `FAME_JSON`,
    /// `FAME_NO_COLOR` and `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).is_some())
    }

    fn from_lookup(is_set: impl Fn(&str) -> bool) -> Self {
        Self {
            quiet: is_set("FAME_QUIET"),
            verbose: is_set("FAME_VERBOSE"),
            json: is_set("FAME_JSON"),
            // https://no-color.org/
            no_color: is_set("FAME_NO_COLOR") || is_set("NO_COLOR"),
        }
    }

    /// A switch is on if either side turns it on.
    pub fn merge(self, other: Self) -> Self {
        Self {
            quiet: self.quiet || other.quiet,
            verbose: self.verbose || other.verbose,
            json: self.json || other.json,
            no_color: self.no_color || other.no_color,
        }
    }
}

static FLAGS: OnceLock<OutputFlags> = OnceLock::new();

/// Install the process-wide output flags. Only the first call takes effect.
pub fn init(flags: OutputFlags) {
    if FLAGS.set(flags).is_err() {
        tracing::debug!("output flags already initialized");
    }
}

/// Active output flags; the environment is consulted until `init` runs.
pub fn flags() -> OutputFlags {
    FLAGS.get().copied().unwrap_or_else(OutputFlags::from_env)
}

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    !flags().no_color && std::io::stderr().is_terminal()
}

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Red X symbol.
    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    /// Yellow warning symbol.
    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print a branded header for CLI output.
pub fn print_header(s: &Styled) {
    eprintln!(
        "  {} {}",
        s.bold("Fame"),
        s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    eprintln!();
}

/// Print a section header (e.g., "Browser", "Config").
pub fn print_section(s: &Styled, title: &str) {
    eprintln!("  {}", s.bold(title));
}

/// Print a check result line with symbol and label/value.
pub fn print_check(symbol: &str, label: &str, value: &str) {
    eprintln!("    {symbol} {label:<16} {value}");
}

/// Print an indented detail/fix line under a check.
pub fn print_detail(msg: &str) {
    eprintln!("                        {msg}");
}

/// Print a status summary line at the bottom.
pub fn print_status(s: &Styled, status: &str, msg: &str) {
    eprintln!();
    eprintln!("  {}: {status} ({msg})", s.bold("Status"));
}

/// Format a duration in seconds into human-readable (e.g., "2m 14s").
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let m = secs / 60;
        let s = secs % 60;
        format!("{m}m {s}s")
    } else {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{h}h {m}m")
    }
}

/// Check if --quiet mode is active.
pub fn is_quiet() -> bool {
    flags().quiet
}

/// Check if --verbose mode is active.
pub fn is_verbose() -> bool {
    flags().verbose
}

/// Check if --json mode is active.
pub fn is_json() -> bool {
    flags().json
}

/// Print JSON output to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(134), "2m 14s");
        assert_eq!(format_duration(8040), "2h 14m");
    }

    #[test]
    fn test_flags_from_lookup() {
        let f = OutputFlags::from_lookup(|k| k == "FAME_JSON" || k == "NO_COLOR");
        assert_eq!(
            f,
            OutputFlags {
                json: true,
                no_color: true,
                ..OutputFlags::default()
            }
        );
        assert_eq!(OutputFlags::from_lookup(|_| false), OutputFlags::default());
    }

    #[test]
    fn test_flags_merge() {
        let cli = OutputFlags {
            quiet: true,
            ..OutputFlags::default()
        };
        let env = OutputFlags {
            verbose: true,
            ..OutputFlags::default()
        };
        let merged = cli.merge(env);
        assert!(merged.quiet && merged.verbose);
        assert!(!merged.json && !merged.no_color);
    }

    #[test]
    fn test_plain_styling() {
        let s = Styled { use_color: false };
        assert_eq!(s.ok_sym(), "OK");
        assert_eq!(s.bold("x"), "x");
        let c = Styled { use_color: true };
        assert_eq!(c.green("x"), "\x1b[32mx\x1b[0m");
    }
}
