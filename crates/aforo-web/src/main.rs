//! aforo-dashboard - serve toll-booth vehicle counts as a JSON API

use std::path::PathBuf;
use std::sync::Arc;

use aforo_app::config::Config;
use aforo_app::dashboard::DashboardService;
use aforo_types::{Result, SourceEncoding};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "aforo-dashboard")]
#[command(version)]
#[command(about = "Serve vehicle-count views over HTTP")]
struct Args {
    /// Wide CSV export. Uses config data_path if not specified.
    #[arg(long, short = 'd')]
    data: Option<PathBuf>,

    /// Listen address. Uses config bind_addr if not specified.
    #[arg(long, short = 'a')]
    addr: Option<String>,

    /// Source CSV encoding (utf8, latin1)
    #[arg(long, short = 'e')]
    encoding: Option<SourceEncoding>,

    /// Field catalogue TOML
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Default forecast horizon in months
    #[arg(long)]
    horizon: Option<usize>,

    /// Verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder().with_env_filter(env).init();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(encoding) = args.encoding {
        config.encoding = encoding;
    }
    if let Some(catalogue) = args.catalogue {
        config.catalogue_path = Some(catalogue);
    }
    if let Some(horizon) = args.horizon {
        config.forecast_horizon = horizon;
    }
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }

    // Load once before accepting connections
    let service = DashboardService::open(&config, args.data.as_deref())?;
    let app = aforo_web::router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "dashboard listening");

    axum::serve(listener, app).await?;

    Ok(())
}
