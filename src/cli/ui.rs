use std::io::{stderr, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use figlet_rs::FIGfont;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::core::model::Host;
use crate::core::snapshot::InstallReport;
use crate::error::GoboError;

static COLORED: AtomicBool = AtomicBool::new(true);

/// Turn colour off for the whole process. crossterm reads `NO_COLOR` itself.
pub fn set_colored(enabled: bool) {
    COLORED.store(enabled, Ordering::Relaxed);
    if !enabled {
        std::env::set_var("NO_COLOR", "1");
    }
}

fn colored() -> bool {
    COLORED.load(Ordering::Relaxed)
}

/// Figlet banner followed by the active environment tag.
pub fn print_banner(active: Option<&str>) {
    if let Ok(font) = FIGfont::standard() {
        if let Some(figure) = font.convert("gobo") {
            let rendered = figure.to_string();
            for (i, line) in rendered.lines().enumerate() {
                let color = match i % 3 {
                    0 => CtColor::Cyan,
                    1 => CtColor::Blue,
                    _ => CtColor::Magenta,
                };
                let _ = execute!(
                    stdout(),
                    SetForegroundColor(color),
                    Print(format!("    {}\n", line)),
                    ResetColor
                );
            }
        }
    }

    let mut out = stdout();
    match active {
        Some(name) => {
            let _ = queue!(
                out,
                Print("    "),
                SetBackgroundColor(CtColor::DarkBlue),
                SetForegroundColor(CtColor::White),
                Print(format!(" env: {} ", name)),
                ResetColor,
                Print("\n\n"),
            );
        }
        None => {
            let _ = queue!(
                out,
                Print("    "),
                SetForegroundColor(CtColor::DarkYellow),
                Print("no active environment"),
                ResetColor,
                Print("\n\n"),
            );
        }
    }
    let _ = out.flush();
}

pub fn print_success(message: &str) {
    let _ = execute!(
        stdout(),
        SetForegroundColor(CtColor::Green),
        Print("✔ "),
        Print(message),
        Print("\n"),
        ResetColor
    );
}

pub fn print_warning(message: &str) {
    let _ = execute!(
        stderr(),
        SetForegroundColor(CtColor::Yellow),
        Print("! "),
        Print(message),
        Print("\n"),
        ResetColor
    );
}

pub fn print_error(error: &GoboError) {
    let _ = execute!(
        stderr(),
        SetForegroundColor(CtColor::Red),
        Print("✘ "),
        Print(format!("{}", error)),
        Print("\n"),
        ResetColor
    );
}

pub fn print_info(message: &str) {
    let _ = execute!(
        stdout(),
        SetForegroundColor(CtColor::Blue),
        Print("· "),
        Print(message),
        Print("\n"),
        ResetColor
    );
}

/// Numbered listing used by `gobo list`. Numbers are 1-based.
pub fn print_environments(names: &[String], active: Option<&str>) {
    println!();
    for (i, name) in names.iter().enumerate() {
        let index = format!("{:3}.", i + 1);
        let index = if colored() {
            index.dimmed().to_string()
        } else {
            index
        };
        let is_active = active == Some(name.as_str());
        let label = match (is_active, colored()) {
            (true, true) => format!("{} {}", name.green().bold(), "(active)".green()),
            (true, false) => format!("{} (active)", name),
            (false, true) => name.cyan().to_string(),
            (false, false) => name.clone(),
        };
        println!("  {} {}", index, label);
    }

    if let Some(name) = active {
        if !names.iter().any(|n| n == name) {
            let line = format!("active: {}", name);
            if colored() {
                println!("\n  {}", line.green());
            } else {
                println!("\n  {}", line);
            }
        }
    }
    println!();
}

pub fn print_empty_store() {
    let _ = execute!(
        stdout(),
        SetForegroundColor(CtColor::Yellow),
        Print("No stored environments.\n"),
        SetForegroundColor(CtColor::Green),
        Print("Get started: "),
        SetForegroundColor(CtColor::Cyan),
        Print("gobo create <name>\n"),
        ResetColor
    );
}

pub fn print_install_report(report: &InstallReport) {
    for path in &report.installed {
        print_success(&format!("installed {}", path));
    }
    for (path, reason) in &report.failed {
        let line = format!("failed {}: {}", path, reason);
        if colored() {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{}", line);
        }
    }
    print_info(&format!(
        "{} installed, {} failed",
        report.installed.len(),
        report.failed.len()
    ));
}

pub fn print_version(host: &Host) {
    let name = if colored() {
        "gobo".bold().to_string()
    } else {
        "gobo".to_string()
    };
    println!("{} {}", name, host.tool_version);
    println!("  os:   {}", host.operating_system);
    println!("  host: {}", host.hostname);
    if !host.user.username.is_empty() {
        println!("  user: {}", host.user.username);
    }
}

/// Spinner for long copies. Hidden automatically when stderr is not a terminal.
pub fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(80));
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▰▱▱▱▱▱",
            "▰▰▱▱▱▱",
            "▰▰▰▱▱▱",
            "▰▰▰▰▱▱",
            "▰▰▰▰▰▱",
            "▰▰▰▰▰▰",
        ]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
