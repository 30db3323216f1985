//! Terminal route table.

use colored::Colorize;

use crate::routes::RouteRecord;

const HEADERS: [&str; 4] = ["METHOD", "URI", "HANDLER", "MIDDLEWARE"];

/// Methods column. `HEAD` is implied by `GET` and hidden next to it.
fn methods_cell(route: &RouteRecord) -> String {
    let has_get = route.methods.iter().any(|m| m == "GET");
    route
        .methods
        .iter()
        .filter(|m| !(has_get && m.as_str() == "HEAD"))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

fn uri_cell(route: &RouteRecord) -> String {
    format!("{} ({})", route.pattern, route.name)
}

/// First two middleware names plus an overflow count.
pub fn middleware_summary(middleware: &[String]) -> String {
    match middleware.len() {
        0..=2 => middleware.join(", "),
        n => format!("{} +{}", middleware[..2].join(", "), n - 2),
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// Render `routes` as an aligned table with a footer.
pub fn render_table(routes: &[RouteRecord]) -> String {
    if routes.is_empty() {
        return format!("{}\n", "No routes matched the given filters.".yellow());
    }

    let rows: Vec<[String; 4]> = routes
        .iter()
        .map(|route| {
            [
                methods_cell(route),
                uri_cell(route),
                route.handler_display(),
                middleware_summary(&route.middleware),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w).bold().to_string())
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    for row in &rows {
        // Pad before coloring so escape codes do not skew alignment.
        let cells = [
            pad(&row[0], widths[0]).green().to_string(),
            pad(&row[1], widths[1]),
            pad(&row[2], widths[2]).cyan().to_string(),
            pad(&row[3], widths[3]).dimmed().to_string(),
        ];
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!("\nShowing {} routes\n", routes.len()));
    out
}
