use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::engine::pagination;
use crate::engine::sort::sort_records;
use crate::engine::view::derive_view;
use crate::errors::AppError;
use crate::models::disposition::{SortKey, SortState};
use crate::models::view::{BoardSnapshot, TableView};
use crate::utils::export;
use crate::AppState;

/// Result of a fetch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was stored; carries the record count.
    Applied(usize),
    /// A newer fetch was issued meanwhile, so this response was dropped.
    Stale,
}

// ── Data Commands ──

/// Fetch the record list and store it.
///
/// Clears the error and raises the loading flag first. A failure is stored as
/// the visible error message and also returned. Loading always ends false for
/// the newest fetch; a response that lost the race is discarded untouched.
pub async fn fetch_dispositions(state: &AppState) -> Result<FetchOutcome, AppError> {
    let ticket = {
        let mut board = state.board.lock().await;
        board.loading = true;
        board.error = None;
        state.fetcher.issue()
    };

    // The lock is not held across the request
    let result = state.fetcher.run(ticket).await;

    let mut board = state.board.lock().await;
    if !state.fetcher.is_current(ticket) {
        warn!("Discarding stale disposition response ({:?})", ticket);
        return Ok(FetchOutcome::Stale);
    }
    board.loading = false;

    match result {
        Ok(records) => {
            let count = records.len();
            board.records = Arc::new(records);
            info!("Loaded {} disposition records", count);
            Ok(FetchOutcome::Applied(count))
        }
        Err(e) => {
            error!("Failed to load dispositions: {}", e);
            board.error = Some(e.user_message());
            Err(e)
        }
    }
}

/// Refresh button and error-panel retry: the same sequence again.
pub async fn refresh(state: &AppState) -> Result<FetchOutcome, AppError> {
    info!("Refresh requested");
    fetch_dispositions(state).await
}

// ── View Commands ──

/// Column header click. The current page is left as is.
pub async fn sort_by(state: &AppState, key: SortKey) -> TableView {
    let mut board = state.board.lock().await;
    board.sort = board.sort.toggled(key);
    info!("Sort changed to {:?}", board.sort);
    view_of(state, &board)
}

/// Replace the sort state outright.
pub async fn set_sort(state: &AppState, sort: SortState) -> TableView {
    let mut board = state.board.lock().await;
    board.sort = sort;
    view_of(state, &board)
}

/// Jump to a numbered page. Any page is accepted; one past the end is empty.
pub async fn go_to_page(state: &AppState, page: usize) -> TableView {
    let mut board = state.board.lock().await;
    board.current_page = page;
    view_of(state, &board)
}

pub async fn previous_page(state: &AppState) -> TableView {
    let mut board = state.board.lock().await;
    board.current_page = pagination::previous_page(board.current_page);
    view_of(state, &board)
}

pub async fn next_page(state: &AppState) -> TableView {
    let mut board = state.board.lock().await;
    let pages = pagination::total_pages(board.records.len(), state.config.page_size);
    board.current_page = pagination::next_page(board.current_page, pages);
    view_of(state, &board)
}

/// First-page shortcut.
pub async fn first_page(state: &AppState) -> TableView {
    go_to_page(state, 1).await
}

/// Last-page shortcut. Stays put when there are no pages.
pub async fn last_page(state: &AppState) -> TableView {
    let mut board = state.board.lock().await;
    let pages = pagination::total_pages(board.records.len(), state.config.page_size);
    if pages > 0 {
        board.current_page = pages;
    }
    view_of(state, &board)
}

/// What the board should display now.
pub async fn snapshot(state: &AppState) -> BoardSnapshot {
    let board = state.board.lock().await;
    if board.loading {
        BoardSnapshot::Loading
    } else if let Some(message) = &board.error {
        BoardSnapshot::Failed {
            message: message.clone(),
        }
    } else {
        BoardSnapshot::Ready(view_of(state, &board))
    }
}

/// Write every record in the current sort order to a CSV file.
pub async fn export_view(state: &AppState, path: &Path) -> Result<usize, AppError> {
    let (records, sort) = {
        let board = state.board.lock().await;
        (board.records.clone(), board.sort)
    };
    let sorted = sort_records(&records, &sort);
    export::write_dispositions_csv(&sorted, state.display_offset(), path)?;
    info!("Exported {} records to {}", sorted.len(), path.display());
    Ok(sorted.len())
}

// ── Helpers ──

fn view_of(state: &AppState, board: &crate::BoardState) -> TableView {
    derive_view(
        &board.records,
        &board.sort,
        board.current_page,
        state.config.page_size,
        state.display_offset(),
    )
}
