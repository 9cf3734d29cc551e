//! Environment readiness check.
//!
//! Verifies that the configured platform maps to a supported browser, that a
//! browser executable can be found, and reports the effective configuration.
//! Every failure includes a fix instruction.

use crate::browser::chromium::find_executable;
use crate::browser::platform::match_platform;
use crate::browser::BrowserKind;
use crate::cli::output::{self, Styled};
use crate::config::{fame_home, FameConfig};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

const KINDS: [BrowserKind; 3] = [BrowserKind::Chrome, BrowserKind::Edge, BrowserKind::Firefox];

/// Run the doctor diagnostic.
pub async fn run(config: &FameConfig, config_path: Option<&Path>) -> Result<()> {
    if output::is_json() {
        return run_json(config, config_path);
    }

    let s = Styled::new();
    let mut ready = true;
    let mut has_warning = false;

    output::print_header(&s);

    // ── System ──────────────────────────────────────────────────────────
    output::print_section(&s, "System");
    output::print_check(
        s.ok_sym(),
        "OS:",
        &format!("{} ({})", format_os(), std::env::consts::ARCH),
    );
    eprintln!();

    // ── Browser ─────────────────────────────────────────────────────────
    output::print_section(&s, "Browser");

    let requested = &config.browser.platform;
    let matched = match_platform(requested, &config.browser.platforms);
    match matched {
        Some(kind) if kind.is_chromium_family() => {
            output::print_check(s.ok_sym(), "Platform:", &format!("'{requested}' -> {kind}"));
        }
        Some(kind) => {
            output::print_check(
                s.fail_sym(),
                "Platform:",
                &format!("'{requested}' -> {kind} (no DevTools protocol)"),
            );
            output::print_detail("Fix: use --platform chrome or --platform edge");
            ready = false;
        }
        None => {
            output::print_check(
                s.fail_sym(),
                "Platform:",
                &format!("'{requested}' is not a supported browser"),
            );
            output::print_detail("Fix: use --platform chrome, edge or firefox");
            ready = false;
        }
    }

    for kind in KINDS {
        let label = format!("{kind}:");
        match find_executable(kind, config.browser.executable.as_deref()) {
            Some(path) => {
                let version = browser_version(&path);
                let ver_str = version.as_deref().unwrap_or("unknown version");
                output::print_check(
                    s.ok_sym(),
                    &label,
                    &format!("{ver_str} at {}", path.display()),
                );
            }
            None if Some(kind) == matched => {
                output::print_check(s.fail_sym(), &label, "NOT FOUND");
                output::print_detail(&format!(
                    "Fix: install {kind} or set FAME_BROWSER_PATH=/path/to/browser"
                ));
                ready = false;
            }
            None => {
                output::print_check(s.warn_sym(), &label, &s.dim("not found"));
            }
        }
    }

    if !config.browser.no_sandbox && is_docker() {
        output::print_check(s.warn_sym(), "Sandbox:", "enabled inside a container");
        output::print_detail("Chrome usually needs FAME_NO_SANDBOX=1 in Docker.");
        has_warning = true;
    }
    eprintln!();

    // ── Config ──────────────────────────────────────────────────────────
    output::print_section(&s, "Config");

    let home = fame_home();
    let default_path = home.join("config.json");
    let source = match config_path {
        Some(p) => p.display().to_string(),
        None if default_path.exists() => default_path.display().to_string(),
        None => "built-in defaults".to_string(),
    };
    output::print_check(s.ok_sym(), "Source:", &source);
    output::print_check(s.ok_sym(), "Home:", &home.display().to_string());
    output::print_check(s.ok_sym(), "Site:", &config.site.base_url);
    output::print_check(
        s.ok_sym(),
        "Match threshold:",
        &format!("{:.2}", config.resolver.match_threshold),
    );
    output::print_check(s.ok_sym(), "Workers:", &config.batch.workers.to_string());

    if ready && !has_warning {
        output::print_status(&s, &s.green("READY"), "all checks passed");
    } else if ready {
        output::print_status(&s, &s.yellow("READY"), "with warnings");
    } else {
        output::print_status(&s, "NOT READY", "fix the issues above");
    }

    Ok(())
}

fn run_json(config: &FameConfig, config_path: Option<&Path>) -> Result<()> {
    let matched = match_platform(&config.browser.platform, &config.browser.platforms);
    let browsers: serde_json::Map<String, serde_json::Value> = KINDS
        .iter()
        .map(|&kind| {
            let path = find_executable(kind, config.browser.executable.as_deref());
            let version = path.as_ref().and_then(|p| browser_version(p));
            (
                kind.to_string(),
                serde_json::json!({
                    "path": path.map(|p| p.display().to_string()),
                    "version": version,
                }),
            )
        })
        .collect();

    let json = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "platform": config.browser.platform,
        "matched_browser": matched,
        "browsers": browsers,
        "config_path": config_path.map(|p| p.display().to_string()),
        "fame_home": fame_home().display().to_string(),
        "config": config,
    });
    output::print_json(&json);
    Ok(())
}

/// Format OS name nicely.
fn format_os() -> String {
    match std::env::consts::OS {
        "macos" => {
            if let Ok(out) = Command::new("sw_vers").arg("-productVersion").output() {
                if out.status.success() {
                    let ver = String::from_utf8_lossy(&out.stdout).trim().to_string();
                    return format!("macOS {ver}");
                }
            }
            "macOS".to_string()
        }
        "linux" => {
            if let Ok(contents) = std::fs::read_to_string("/etc/os-release") {
                for line in contents.lines() {
                    if let Some(name) = line.strip_prefix("PRETTY_NAME=") {
                        return name.trim_matches('"').to_string();
                    }
                }
            }
            "Linux".to_string()
        }
        other => other.to_string(),
    }
}

fn browser_version(path: &PathBuf) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if output.status.success() {
        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Some(strip_vendor(&raw))
    } else {
        None
    }
}

fn strip_vendor(raw: &str) -> String {
    raw.replace("Google Chrome ", "")
        .replace("Chromium ", "")
        .replace("Microsoft Edge ", "")
        .replace("Mozilla Firefox ", "")
}

fn is_docker() -> bool {
    Path::new("/.dockerenv").exists()
        || std::fs::read_to_string("/proc/1/cgroup")
            .map(|c| c.contains("docker") || c.contains("containerd"))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_vendor() {
        assert_eq!(strip_vendor("Google Chrome 126.0.6478.126"), "126.0.6478.126");
        assert_eq!(strip_vendor("Microsoft Edge 125.0.2535.92"), "125.0.2535.92");
        assert_eq!(strip_vendor("Mozilla Firefox 127.0"), "127.0");
    }
}
