use serde::Serialize;

use super::disposition::{SortKey, SortState};
use crate::engine::pagination::PageControl;

/// One table row, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub symbol: String,
    pub name: String,
    pub stock_date: String,
    /// Market name as sent, `-` when missing
    pub market: String,
    /// Lowercase style tag for the market cell
    pub market_tag: String,
    pub start: String,
    pub end: String,
}

impl RowView {
    /// Cell text for a column.
    pub fn cell(&self, key: SortKey) -> &str {
        match key {
            SortKey::Symbol => &self.symbol,
            SortKey::Name => &self.name,
            SortKey::Market => &self.market,
            SortKey::Start => &self.start,
            SortKey::End => &self.end,
            SortKey::StockDate => &self.stock_date,
        }
    }
}

/// Everything a front end needs to draw the table for the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    /// Records across all pages
    pub total_records: usize,
    pub sort: SortState,
    /// e.g. "Data Date (descending)", absent while unsorted
    pub sort_label: Option<String>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub rows: Vec<RowView>,
    /// 1-based inclusive row range on this page
    pub range: Option<(usize, usize)>,
    pub controls: Vec<PageControl>,
}

impl TableView {
    /// Sort marker for a column header.
    pub fn sort_icon(&self, key: SortKey) -> &'static str {
        use super::disposition::SortDirection;

        match (self.sort.key == Some(key), self.sort.direction) {
            (false, _) => "↕",
            (true, SortDirection::Asc) => "↑",
            (true, SortDirection::Desc) => "↓",
        }
    }

    /// Footer text, e.g. "Showing 13 - 24 of 25 records".
    pub fn range_summary(&self) -> Option<String> {
        self.range.map(|(first, last)| {
            format!(
                "Showing {} - {} of {} records",
                first, last, self.total_records
            )
        })
    }
}

/// What the board shows right now. Loading wins over an error, and an error
/// replaces the table entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BoardSnapshot {
    Loading,
    Failed { message: String },
    Ready(TableView),
}
