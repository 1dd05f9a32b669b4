//! Rendering surfaces for the board: an interactive terminal table and a
//! plain-text page for scripts.

pub mod render;
pub mod terminal;
pub mod text;

use ratatui::style::Color;

use crate::engine::pagination::PageControl;

/// Label of one pagination control.
pub fn control_label(control: &PageControl) -> String {
    match control {
        PageControl::Previous { .. } => "‹ Prev".to_string(),
        PageControl::Page { number, active: true } => format!("[{}]", number),
        PageControl::Page { number, .. } => number.to_string(),
        PageControl::Ellipsis => "...".to_string(),
        PageControl::Next { .. } => "Next ›".to_string(),
    }
}

/// Colour for a market style tag.
pub fn market_color(tag: &str) -> Color {
    match tag {
        "twse" | "上市" => Color::Cyan,
        "tpex" | "otc" | "上櫃" => Color::Magenta,
        "unknown" => Color::DarkGray,
        _ => Color::Yellow,
    }
}
