//! Terminal output for listings

use crate::session::{ConnectionStatus, Reconciliation};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use std::io::IsTerminal;

/// Whether status cells get colour; resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colour when stdout is a terminal and `NO_COLOR` is unset
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(std::io::stdout().is_terminal() && !no_color)
    }

    pub fn color(&self) -> bool {
        self.color
    }

    fn status_style(status: &ConnectionStatus) -> Option<Color> {
        match status {
            ConnectionStatus::Connected => Some(Color::Green),
            ConnectionStatus::Disconnected => Some(Color::Red),
            ConnectionStatus::Other(_) => None,
        }
    }

    fn status_cell(&self, status: &ConnectionStatus) -> Cell {
        let cell = Cell::new(status.as_str());
        match Self::status_style(status) {
            Some(color) if self.color => cell.fg(color).add_attribute(Attribute::Bold),
            _ => cell,
        }
    }
}

/// The connection table; address and duration columns only when something
/// is connected
pub fn render_table(listing: &Reconciliation, palette: Palette) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    if palette.color() {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    if listing.any_connected {
        table.set_header(vec![
            "ID",
            "Name",
            "Status",
            "Connected for",
            "Client IP",
            "Server IP",
        ]);
    } else {
        table.set_header(vec!["ID", "Name", "Status"]);
    }

    for record in &listing.records {
        let mut row = vec![
            Cell::new(record.id),
            Cell::new(&record.name),
            palette.status_cell(&record.status),
        ];
        if listing.any_connected {
            row.push(Cell::new(&record.since));
            row.push(Cell::new(&record.client_addr));
            row.push(Cell::new(&record.server_addr));
        }
        table.add_row(row);
    }

    table.to_string()
}

pub fn render_json(listing: &Reconciliation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&listing.records)
}

/// Active profile names joined by `separator`
pub fn render_names(names: &[String], separator: &str) -> String {
    names.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DisplayRecord;

    fn record(id: u32, name: &str, status: ConnectionStatus) -> DisplayRecord {
        DisplayRecord {
            id,
            name: name.to_string(),
            status,
            since: String::new(),
            client_addr: String::new(),
            server_addr: String::new(),
        }
    }

    #[test]
    fn test_table_without_connections_has_three_columns() {
        let listing = Reconciliation {
            records: vec![record(1, "home", ConnectionStatus::Disconnected)],
            any_connected: false,
        };

        let out = render_table(&listing, Palette::new(false));

        assert!(out.contains("Status"));
        assert!(out.contains("Disconnected"));
        assert!(!out.contains("Client IP"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_table_with_connection_has_all_columns() {
        let mut connected = record(2, "office", ConnectionStatus::Connected);
        connected.since = "1 mins 5 secs".to_string();
        connected.client_addr = "172.16.0.2".to_string();
        let listing = Reconciliation {
            records: vec![record(1, "home", ConnectionStatus::Disconnected), connected],
            any_connected: true,
        };

        let out = render_table(&listing, Palette::new(false));

        assert!(out.contains("Connected for"));
        assert!(out.contains("Server IP"));
        assert!(out.contains("1 mins 5 secs"));
        assert!(out.contains("172.16.0.2"));
    }

    #[test]
    fn test_status_styles() {
        assert_eq!(Palette::status_style(&ConnectionStatus::Connected), Some(Color::Green));
        assert_eq!(Palette::status_style(&ConnectionStatus::Disconnected), Some(Color::Red));
        assert_eq!(Palette::status_style(&ConnectionStatus::Other("Connecting".into())), None);
    }

    #[test]
    fn test_json_uses_status_text() {
        let listing = Reconciliation {
            records: vec![record(1, "home", ConnectionStatus::Other("Connecting".into()))],
            any_connected: false,
        };

        let out = render_json(&listing).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["status"], "Connecting");
        assert_eq!(parsed[0]["id"], 1);
    }

    #[test]
    fn test_render_names() {
        let names = vec!["office".to_string(), "home".to_string()];
        assert_eq!(render_names(&names, ""), "officehome");
        assert_eq!(render_names(&names, "\n"), "office\nhome");
    }
}
