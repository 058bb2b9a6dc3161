//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::Role;
use crate::guard::{Decision, RouteTable};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print the route access table, one column per role
pub fn print_route_table(table: &RouteTable) {
    let mut header = vec![
        Cell::new("Prefix").fg(Color::Cyan),
        Cell::new("Match").fg(Color::Cyan),
    ];
    header.extend(Role::ALL.iter().map(|role| Cell::new(role.as_str()).fg(Color::Cyan)));

    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for rule in table.rules() {
        let mut row = vec![
            Cell::new(&rule.prefix),
            Cell::new(if rule.exact { "exact" } else { "prefix" }),
        ];
        row.extend(Role::ALL.iter().map(|role| access_cell(rule.roles.contains(*role))));
        out.add_row(row);
    }

    let mut fallback = vec![Cell::new("(unmatched)").fg(Color::DarkGrey), Cell::new("-")];
    fallback.extend(
        Role::ALL
            .iter()
            .map(|role| access_cell(table.fallback().contains(*role))),
    );
    out.add_row(fallback);

    println!("{out}");
    println!(
        "  {} {}    {} {:?}",
        "Home:".bold(),
        table.home(),
        "Matching:".bold(),
        table.matching()
    );
}

fn access_cell(allowed: bool) -> Cell {
    if allowed {
        Cell::new("✓").fg(Color::Green)
    } else {
        Cell::new("✗").fg(Color::Red)
    }
}

/// Print the outcome of a guard check
pub fn print_decision(path: &str, role: Role, decision: &Decision) {
    match decision {
        Decision::Allow => println!(
            "{} {} may open {}",
            "ALLOW".green().bold(),
            role,
            path.cyan()
        ),
        Decision::Redirect { to } => println!(
            "{} {} is sent from {} to {}",
            "REDIRECT".red().bold(),
            role,
            path.cyan(),
            to.cyan()
        ),
    }
}
