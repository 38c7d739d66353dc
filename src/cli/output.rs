//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::policy::StrengthReport;
use crate::vault::CredentialRecord;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a numbered table of records (#, Website, Nickname, Password).
pub fn print_records_table(records: &[CredentialRecord], show_passwords: bool) {
    if records.is_empty() {
        info("No passwords in this vault yet.");
        tip("Run `passvault add <WEBSITE>` to add your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Website", "Nickname", "Password"]);

    for (i, r) in records.iter().enumerate() {
        let password = if show_passwords {
            r.password.clone()
        } else {
            mask(&r.password)
        };
        table.add_row(vec![
            (i + 1).to_string(),
            r.website.clone(),
            r.nickname.clone().unwrap_or_else(|| "-".to_string()),
            password,
        ]);
    }

    println!("{table}");
}

/// Print a strength meter and the requirement checklist.
pub fn print_strength_report(report: &StrengthReport) {
    let meter = format!("{}%", report.score);
    let meter = match report.band() {
        "teal" => style(meter).green().bold(),
        "yellow" => style(meter).yellow().bold(),
        _ => style(meter).red().bold(),
    };
    println!("Strength: {meter}");

    for check in &report.checks {
        if check.met {
            println!("  {} {}", style("\u{2713}").green(), check.label);
        } else {
            println!("  {} {}", style("\u{2717}").red(), check.label);
        }
    }
}

fn mask(password: &str) -> String {
    "\u{2022}".repeat(password.chars().count().min(12))
}
