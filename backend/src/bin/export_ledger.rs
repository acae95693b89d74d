//! Write the plain-text ledger report from a database file without starting
//! the server.
//!
//! The report goes to stdout unless `--output` is given. When `--output`
//! names a directory the timestamped report filename is used inside it.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use utang::domain::LedgerService;
use utang::domain::ports::LedgerQuery;
use utang::inbound::report::{render_report, report_filename};
use utang::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};

/// `export-ledger` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "export-ledger",
    about = "Export the credit ledger as a plain-text report",
    version
)]
struct CliArgs {
    /// SQLite database file holding the ledger.
    #[arg(long = "database", value_name = "path", default_value = "utang.db")]
    database: PathBuf,
    /// File or directory to write the report to; stdout when omitted.
    #[arg(long = "output", value_name = "path")]
    output: Option<PathBuf>,
    /// Store name printed in the report heading.
    #[arg(long = "store-name", value_name = "name", default_value = "Tindahan")]
    store_name: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| eyre!(e))
        .wrap_err("failed to initialise tracing")?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build export runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let pool = DbPool::new(PoolConfig::new(args.database.to_string_lossy()).with_max_size(1))
        .with_context(|| format!("failed to open ledger at {}", args.database.display()))?;
    let service = LedgerService::new(
        Arc::new(DieselLedgerRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    let snapshot = service
        .export_snapshot()
        .await
        .wrap_err("failed to read ledger")?;
    let report =
        render_report(&snapshot, &args.store_name).wrap_err("failed to render ledger report")?;

    match args.output {
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(report.as_bytes())
                .wrap_err("failed to write report to stdout")?;
            stdout.flush().wrap_err("failed to flush stdout")?;
        }
        Some(output) => {
            let target = save_report(&output, &report_filename(snapshot.generated_at), &report)?;
            info!(
                path = %target.display(),
                entries = snapshot.entries.len(),
                "wrote ledger report"
            );
        }
    }
    Ok(())
}

/// Write `report` to `output`, or inside it under `filename` when it is a
/// directory. Returns the path written.
fn save_report(output: &Path, filename: &str, report: &str) -> Result<PathBuf> {
    let target = resolve_target(output, filename);
    fs::write(&target, report)
        .with_context(|| format!("failed to write report to {}", target.display()))?;
    Ok(target)
}

fn resolve_target(output: &Path, filename: &str) -> PathBuf {
    if output.is_dir() {
        output.join(filename)
    } else {
        output.to_path_buf()
    }
}
