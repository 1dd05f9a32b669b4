use std::fmt::Write as FmtWrite;

use ratatui::text::Span;

use super::control_label;
use crate::models::disposition::SortKey;
use crate::models::view::TableView;

const NO_DATA: &str = "No records found";

/// Display width, counting CJK characters as two columns.
fn width(s: &str) -> usize {
    Span::raw(s).width()
}

fn pad(s: &str, to: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(to.saturating_sub(width(s))));
    out
}

/// Plain-text rendering of one page: summary line, aligned columns, footer.
pub fn render_table(view: &TableView) -> String {
    let mut out = String::new();

    let _ = write!(out, "Disposition records: {}", view.total_records);
    if let Some(label) = &view.sort_label {
        let _ = write!(out, "  (sorted by {})", label);
    }
    out.push('\n');

    let headers: Vec<String> = SortKey::COLUMNS
        .iter()
        .map(|k| format!("{} {}", k.label(), view.sort_icon(*k)))
        .collect();
    let widths: Vec<usize> = SortKey::COLUMNS
        .iter()
        .zip(&headers)
        .map(|(k, h)| {
            view.rows
                .iter()
                .map(|r| width(r.cell(*k)))
                .chain(std::iter::once(width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers.iter().zip(&widths).map(|(h, w)| pad(h, *w)).collect();
    let _ = writeln!(out, "{}", header_line.join("  ").trim_end());
    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{}", "-".repeat(rule));

    if view.rows.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
    }
    for row in &view.rows {
        let cells: Vec<String> = SortKey::COLUMNS
            .iter()
            .zip(&widths)
            .map(|(k, w)| pad(row.cell(*k), *w))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }

    if view.total_records > 0 {
        out.push('\n');
        if let Some(summary) = view.range_summary() {
            let _ = writeln!(out, "{}", summary);
        }
        let bar: Vec<String> = view.controls.iter().map(control_label).collect();
        let _ = writeln!(out, "{}", bar.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::view::derive_view;
    use crate::models::disposition::{DispositionRecord, SortDirection, SortState};
    use chrono::FixedOffset;

    fn records(n: usize) -> Vec<DispositionRecord> {
        (0..n)
            .map(|i| DispositionRecord {
                symbol: (2000 + i).to_string(),
                name: format!("Co {}", i),
                market: Some("TWSE".to_string()),
                start: Some("2024-03-01".to_string()),
                end: Some("2024-03-14".to_string()),
                stock_date: Some("2024-02-29".to_string()),
            })
            .collect()
    }

    #[test]
    fn test_render_first_page() {
        let recs = records(13);
        let sort = SortState::new(SortKey::Symbol, SortDirection::Desc);
        let view = derive_view(&recs, &sort, 1, 12, FixedOffset::east_opt(8 * 3600).unwrap());
        let text = render_table(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Disposition records: 13  (sorted by Symbol (descending))");
        assert!(lines[1].starts_with("Symbol ↓"));
        assert!(lines[3].starts_with("2012"));
        assert!(lines[3].contains("2024/2/29"));
        assert!(text.contains("Showing 1 - 12 of 13 records"));
        assert!(text.contains("‹ Prev [1] 2 Next ›"));
    }

    #[test]
    fn test_render_empty_page() {
        let view = derive_view(&[], &SortState::default(), 1, 12, FixedOffset::east_opt(0).unwrap());
        let text = render_table(&view);
        assert!(text.contains(NO_DATA));
        assert!(!text.contains("Showing"));
    }

    #[test]
    fn test_wide_names_are_aligned() {
        assert_eq!(width("台積電"), 6);
        assert_eq!(pad("台積電", 8), "台積電  ");
    }
}
