use chrono::FixedOffset;
use tracing::debug;

use super::pagination::{page_controls, page_slice, total_pages, visible_range};
use super::sort::sort_records;
use crate::models::disposition::{DispositionRecord, SortState};
use crate::models::view::{RowView, TableView};
use crate::utils::format::{format_date, market_tag};

/// Format one record for the table.
pub fn row_view(record: &DispositionRecord, offset: FixedOffset) -> RowView {
    RowView {
        symbol: record.symbol.clone(),
        name: record.name.clone(),
        stock_date: format_date(record.stock_date.as_deref(), offset),
        market: record.market.clone().unwrap_or_else(|| "-".to_string()),
        market_tag: market_tag(record.market.as_deref()),
        start: format_date(record.start.as_deref(), offset),
        end: format_date(record.end.as_deref(), offset),
    }
}

/// Derive the visible table from the fetched records and the view state.
///
/// Pure: the same inputs always give the same view, and `records` is never
/// reordered. A page past the end yields no rows.
pub fn derive_view(
    records: &[DispositionRecord],
    sort: &SortState,
    current_page: usize,
    page_size: usize,
    offset: FixedOffset,
) -> TableView {
    let sorted = sort_records(records, sort);
    let pages = total_pages(sorted.len(), page_size);
    let rows: Vec<RowView> = page_slice(&sorted, current_page, page_size)
        .iter()
        .map(|r| row_view(r, offset))
        .collect();

    debug!(
        "Derived view: page {}/{} with {} rows, sort={:?}",
        current_page,
        pages,
        rows.len(),
        sort
    );

    TableView {
        total_records: sorted.len(),
        sort: *sort,
        sort_label: sort
            .key
            .map(|k| format!("{} ({})", k.label(), sort.direction.label())),
        current_page,
        total_pages: pages,
        page_size,
        rows,
        range: visible_range(sorted.len(), current_page, page_size),
        controls: page_controls(current_page, pages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::disposition::{SortDirection, SortKey};

    fn taipei() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    /// 25 records; record i has stock_date 2024-01-(i+1) and symbol 1000+i.
    fn twenty_five() -> Vec<DispositionRecord> {
        (0..25)
            .map(|i| DispositionRecord {
                symbol: (1000 + i).to_string(),
                name: format!("Stock {}", i),
                market: Some(if i % 2 == 0 { "TWSE" } else { "TPEx" }.to_string()),
                start: Some("2024-02-01".to_string()),
                end: None,
                stock_date: Some(format!("2024-01-{:02}", i + 1)),
            })
            .collect()
    }

    #[test]
    fn test_stock_date_desc_pages() {
        let records = twenty_five();
        let sort = SortState::new(SortKey::StockDate, SortDirection::Desc);

        let page1 = derive_view(&records, &sort, 1, 12, taipei());
        assert_eq!(page1.total_pages, 3);
        assert_eq!(page1.rows.len(), 12);
        assert_eq!(page1.rows[0].stock_date, "2024/1/25");
        assert_eq!(page1.rows[11].stock_date, "2024/1/14");
        assert_eq!(page1.range, Some((1, 12)));

        let page3 = derive_view(&records, &sort, 3, 12, taipei());
        assert_eq!(page3.rows.len(), 1);
        assert_eq!(page3.rows[0].symbol, "1000");
        assert_eq!(
            page3.range_summary().as_deref(),
            Some("Showing 25 - 25 of 25 records")
        );
    }

    #[test]
    fn test_page_past_end_is_empty_not_clamped() {
        let records = twenty_five();
        let view = derive_view(&records, &SortState::default(), 5, 12, taipei());
        assert!(view.rows.is_empty());
        assert_eq!(view.total_records, 25);
        assert_eq!(view.range, None);
    }

    #[test]
    fn test_empty_records() {
        let view = derive_view(&[], &SortState::default(), 1, 12, taipei());
        assert_eq!(view.total_pages, 0);
        assert!(view.rows.is_empty());
        assert_eq!(view.sort_label, None);
    }

    #[test]
    fn test_row_formatting_and_sort_markers() {
        let mut records = twenty_five();
        records[0].market = None;
        let sort = SortState::new(SortKey::Symbol, SortDirection::Asc);
        let view = derive_view(&records, &sort, 1, 12, taipei());

        let row = &view.rows[0];
        assert_eq!(row.market, "-");
        assert_eq!(row.market_tag, "unknown");
        assert_eq!(row.end, "-");
        assert_eq!(row.start, "2024/2/1");
        assert_eq!(view.rows[1].market_tag, "tpex");
        assert_eq!(view.sort_label.as_deref(), Some("Symbol (ascending)"));
        assert_eq!(view.sort_icon(SortKey::Symbol), "↑");
        assert_eq!(view.sort_icon(SortKey::Name), "↕");
    }
}
