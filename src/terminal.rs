//! Terminal adapters for the dashboard seams and plain-text rendering.

use rx_core::{BadgeColor, DisplayStatus};
use rx_dashboard::{HistoryRow, Navigator, Notice, NoticeLevel, Notifier, Route};
use std::sync::{Mutex, PoisonError};

/// Records where the views asked to go; the command loop reacts after the command ends.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    last: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn last_route(&self) -> Option<Route> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("navigate to {}", route);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

/// Prints notices as single lines: successes to stdout, errors to stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    color: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                println!("{} {}", paint("✔", BadgeColor::Green, self.color), notice.message)
            }
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => {
                eprintln!("{} {}", paint("✘", BadgeColor::Red, self.color), notice.message)
            }
        }
    }
}

pub fn paint(text: &str, color: BadgeColor, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", color.ansi_code(), text)
    } else {
        text.to_string()
    }
}

/// Status chip: glyph and label in the badge colour.
pub fn status_chip(status: DisplayStatus, enabled: bool) -> String {
    let badge = status.badge();
    paint(
        &format!("{} {}", badge.icon.glyph(), status.as_str()),
        badge.color,
        enabled,
    )
}

const HEADERS: [&str; 6] = ["Patient", "Medication", "Dosage", "Delivery", "Status", "Created"];

/// Render history rows as an aligned table.
pub fn render_history(rows: &[HistoryRow], color: bool) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            let badge = row.badge();
            [
                format!("{} (DOB: {})", row.patient_name, row.patient_dob),
                row.medication.clone(),
                row.dosage.clone(),
                row.delivery.clone(),
                format!("{} {}", badge.icon.glyph(), row.status.as_str()),
                row.created.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS.map(str::to_string).iter(), &widths, |_, text| text);
    push_line(
        &mut out,
        widths.map(|w| "-".repeat(w)).iter(),
        &widths,
        |_, text| text,
    );
    for (row, line) in rows.iter().zip(&cells) {
        let status_color = row.badge().color;
        push_line(&mut out, line.iter(), &widths, |column, text| {
            if column == 4 {
                paint(&text, status_color, color)
            } else {
                text
            }
        });
    }
    out
}

// pads before colouring so escape codes do not skew the widths
fn push_line<'a>(
    out: &mut String,
    cells: impl Iterator<Item = &'a String>,
    widths: &[usize; 6],
    style: impl Fn(usize, String) -> String,
) {
    let line: Vec<String> = cells
        .zip(widths)
        .enumerate()
        .map(|(column, (cell, &width))| style(column, format!("{cell:<width$}")))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
