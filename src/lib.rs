pub mod cli;
pub mod commands;
pub mod engine;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use clap::Parser;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::engine::fetch::{DispositionSource, FetchController, HttpSource};
use crate::models::config::BoardConfig;
use crate::models::disposition::{DispositionRecord, SortState};

/// Mutable board state. Records are only ever replaced as a whole.
#[derive(Debug)]
pub struct BoardState {
    pub records: Arc<Vec<DispositionRecord>>,
    pub loading: bool,
    pub error: Option<String>,
    pub sort: SortState,
    /// 1-based
    pub current_page: usize,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            // The first fetch starts as soon as the board is shown
            loading: true,
            error: None,
            sort: SortState::default(),
            current_page: 1,
        }
    }
}

/// Shared application state, accessible from all commands.
pub struct AppState {
    pub board: Mutex<BoardState>,
    pub config: BoardConfig,
    pub fetcher: FetchController,
}

impl AppState {
    pub fn new(config: BoardConfig, source: Arc<dyn DispositionSource>) -> Self {
        Self {
            board: Mutex::new(BoardState::default()),
            config,
            fetcher: FetchController::new(source),
        }
    }

    /// Offset used for calendar dates. UTC if the configured one is out of range.
    pub fn display_offset(&self) -> FixedOffset {
        self.config.display_offset().unwrap_or_else(|| Utc.fix())
    }
}

fn init_tracing(interactive: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        // Log lines would tear the terminal UI, so stay quiet unless asked
        Err(_) if interactive => EnvFilter::new("off"),
        Err(_) => EnvFilter::new("info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or_default();
    init_tracing(matches!(command, Command::Tui));

    let config = cli.resolve_config()?;
    info!(
        "Starting disposition board against {}",
        config.endpoint_url()
    );

    let source: Arc<dyn DispositionSource> = Arc::new(HttpSource::new(&config));
    let state = Arc::new(AppState::new(config, source));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli::dispatch(command, state))
}
