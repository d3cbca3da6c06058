use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tr300::config::{FileConfig, OutputMode, ReportConfig};
use tr300::error::ReportError;
use tr300::host::SystemHost;
use tr300::platform::Platform;
use tr300::{engine, render};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// One-shot machine report for the current host.
#[derive(Debug, Parser)]
#[command(name = "tr300", version, about)]
struct Cli {
    /// Draw the table with plain ASCII characters
    #[arg(long)]
    ascii: bool,
    /// Print a JSON document instead of the table (wins over --ascii)
    #[arg(long)]
    json: bool,
    /// Replace the header title
    #[arg(short, long)]
    title: Option<String>,
    /// Disable colored usage bars
    #[arg(long)]
    no_color: bool,
    /// Skip slow probes for a quicker, less complete report
    #[arg(long)]
    fast: bool,
}

impl Cli {
    fn report_config(self, file: &FileConfig) -> ReportConfig {
        let base = ReportConfig::from_file(file);
        let mode = if self.json {
            OutputMode::Json
        } else if self.ascii || base.mode == OutputMode::Ascii {
            OutputMode::Ascii
        } else {
            OutputMode::Table
        };
        let use_color = base.use_color && !self.no_color && std::io::stdout().is_terminal();
        let fast = base.fast || self.fast;
        base.with_mode(mode)
            .with_title(self.title)
            .with_color(use_color)
            .with_fast(fast)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file = FileConfig::load()?;
    let config = cli.report_config(&file);
    tracing::debug!(?config, "report config");

    let host = Arc::new(SystemHost::new(config.command_timeout));
    let snapshot = engine::collect_snapshot(host, config.collect_plan(Platform::current())).await?;
    let report = render::render(&snapshot, &config);

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(ReportError::Output)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tr300: {e:#}");
            ExitCode::FAILURE
        }
    }
}
