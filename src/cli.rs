use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};

use crate::commands::{self, FetchOutcome};
use crate::errors::AppError;
use crate::models::config::BoardConfig;
use crate::models::disposition::{SortDirection, SortKey, SortState};
use crate::models::view::BoardSnapshot;
use crate::{ui, AppState};

/// Browse stock disposition records.
#[derive(Debug, Parser)]
#[command(name = "disposition-board", version, about)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API root, e.g. http://localhost:8888
    #[arg(long, env = "DISPOSITION_API_URL", global = true)]
    pub base_url: Option<String>,

    /// Path under the API root (`disposition` or `dispositions`)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Rows per page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Default, Subcommand)]
pub enum Command {
    /// Interactive table (default)
    #[default]
    Tui,
    /// Fetch once and print one page
    List(ListArgs),
    /// Fetch once and write every record to CSV
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SortArgs {
    /// Column to sort by: symbol, name, market, start, end, stock_date
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl SortArgs {
    pub fn sort_state(&self) -> SortState {
        SortState {
            key: self.sort,
            direction: if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub sort: SortArgs,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Print the page (or the error) as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub sort: SortArgs,

    /// Destination CSV file
    #[arg(long, short)]
    pub output: PathBuf,
}

impl Cli {
    /// Settings file (or defaults) with command line overrides applied.
    pub fn resolve_config(&self) -> Result<BoardConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::load(path)?,
            None => BoardConfig::default(),
        };
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if self.timeout_secs.is_some() {
            config.timeout_secs = self.timeout_secs;
        }
        config.validated()
    }
}

/// Run a subcommand against the shared state.
pub async fn dispatch(command: Command, state: Arc<AppState>) -> anyhow::Result<()> {
    match command {
        Command::Tui => ui::terminal::run(state)
            .await
            .context("terminal UI failed"),
        Command::List(args) => {
            if let Err(e) = commands::fetch_dispositions(&state).await {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&e)?);
                }
                return Err(anyhow!(e.user_message()));
            }
            commands::set_sort(&state, args.sort.sort_state()).await;
            commands::go_to_page(&state, args.page).await;
            let snapshot = commands::snapshot(&state).await;
            print!("{}", render_list(&snapshot, args.json)?);
            Ok(())
        }
        Command::Export(args) => {
            load_once(&state).await?;
            commands::set_sort(&state, args.sort.sort_state()).await;
            let count = commands::export_view(&state, &args.output)
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            println!("Exported {} records to {}", count, args.output.display());
            Ok(())
        }
    }
}

/// Output of `list`: the table as text, or the whole snapshot as JSON.
fn render_list(snapshot: &BoardSnapshot, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(snapshot)?));
    }
    match snapshot {
        BoardSnapshot::Ready(view) => Ok(ui::text::render_table(view)),
        BoardSnapshot::Failed { message } => Err(anyhow!(message.clone())),
        BoardSnapshot::Loading => Err(anyhow!("records are still loading")),
    }
}

async fn load_once(state: &AppState) -> anyhow::Result<()> {
    match commands::fetch_dispositions(state).await {
        Ok(FetchOutcome::Applied(_)) | Ok(FetchOutcome::Stale) => Ok(()),
        Err(e) => Err(anyhow!(e.user_message())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::view::derive_view;
    use crate::models::disposition::DispositionRecord;
    use chrono::FixedOffset;

    #[test]
    fn test_no_subcommand_defaults_to_tui() {
        let cli = Cli::try_parse_from(["disposition-board"]).unwrap();
        assert!(matches!(cli.command.unwrap_or_default(), Command::Tui));
    }

    #[test]
    fn test_list_args() {
        let cli = Cli::try_parse_from([
            "disposition-board",
            "list",
            "--sort",
            "stock_date",
            "--desc",
            "--page",
            "3",
        ])
        .unwrap();
        match cli.command {
            Some(Command::List(args)) => {
                assert_eq!(args.page, 3);
                assert_eq!(
                    args.sort.sort_state(),
                    SortState::new(SortKey::StockDate, SortDirection::Desc)
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_list_json_output() {
        let records = vec![DispositionRecord {
            symbol: "2330".to_string(),
            name: "TSMC".to_string(),
            market: Some("TWSE".to_string()),
            start: Some("2024-01-02".to_string()),
            end: Some("2024-01-15".to_string()),
            stock_date: Some("2023-12-29".to_string()),
        }];
        let view = derive_view(
            &records,
            &SortState::new(SortKey::Symbol, SortDirection::Desc),
            1,
            12,
            FixedOffset::east_opt(8 * 3600).unwrap(),
        );

        let out = render_list(&BoardSnapshot::Ready(view), true).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["total_records"], 1);
        assert_eq!(json["rows"][0]["symbol"], "2330");
        assert_eq!(json["rows"][0]["start"], "2024/1/2");
        assert_eq!(json["controls"][0]["type"], "previous");

        let failed = BoardSnapshot::Failed {
            message: "no data".to_string(),
        };
        let out = render_list(&failed, true).unwrap();
        assert!(out.contains("\"status\": \"failed\""));
        assert_eq!(render_list(&failed, false).unwrap_err().to_string(), "no data");
    }

    #[test]
    fn test_list_json_flag() {
        let cli = Cli::try_parse_from(["disposition-board", "list", "--json"]).unwrap();
        match cli.command {
            Some(Command::List(args)) => assert!(args.json),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["disposition-board", "list", "--desc"]).is_err());
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let cli = Cli::try_parse_from([
            "disposition-board",
            "--base-url",
            "http://10.0.0.5:9000",
            "--endpoint",
            "dispositions",
            "--page-size",
            "10",
            "export",
            "--output",
            "out.csv",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.endpoint_url(), "http://10.0.0.5:9000/dispositions");
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let cli = Cli::try_parse_from(["disposition-board", "--page-size", "0"]).unwrap();
        assert!(cli.resolve_config().is_err());
    }
}
