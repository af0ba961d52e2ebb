//! Command handlers

use std::path::{Path, PathBuf};

use aforo_app::config::Config;
use aforo_app::dashboard::{ColumnsView, DashboardService};
use aforo_app::export::export_to_excel;
use aforo_domain::service::resolve_columns;
use aforo_infra::{catalogue_loader, csv_source, tidy_writer};
use aforo_types::{OutputFormat, Result, SourceEncoding};
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::output;

pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    // Global flags override the stored config for this run only
    if let Some(encoding) = cli.encoding {
        config.encoding = encoding;
    }
    if let Some(catalogue) = &cli.catalogue {
        config.catalogue_path = Some(catalogue.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Reshape {
            input,
            output,
            year,
        } => cmd_reshape(&config, input.as_deref(), output.as_deref(), *year, output_format),

        Commands::Columns { input } => cmd_columns(&config, input.as_deref(), output_format),

        Commands::Summary { input, year } => {
            let service = DashboardService::open(&config, input.as_deref())?;
            output::print_totals(output_format, &service.totals(*year), &service.quality())
        }

        Commands::Forecast {
            input,
            year,
            horizon,
        } => {
            let service = DashboardService::open(&config, input.as_deref())?;
            output::print_forecast(output_format, &service.forecast(*year, *horizon))
        }

        Commands::Export {
            input,
            output,
            year,
        } => cmd_export(&config, input.as_deref(), output.clone(), *year),

        Commands::Catalogue { output } => cmd_catalogue(&config, output.as_deref()),

        Commands::Config {
            show,
            set_data,
            set_encoding,
            set_catalogue,
            set_horizon,
            set_output,
            set_bind,
            reset,
        } => cmd_config(
            *show,
            set_data.clone(),
            *set_encoding,
            set_catalogue.clone(),
            *set_horizon,
            *set_output,
            set_bind.clone(),
            *reset,
        ),
    }
}

fn cmd_reshape(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
    year: Option<i32>,
    output_format: OutputFormat,
) -> Result<()> {
    let service = DashboardService::open(config, input)?;
    let records = service.records(year);

    match output {
        Some(path) => {
            tidy_writer::write_tidy_csv_file(path, &records)?;
            info!(path = %path.display(), records = records.len(), "tidy CSV written");
            eprintln!("Wrote {} tidy records to {}", records.len(), path.display());
            Ok(())
        }
        None => output::print_records(output_format, &records),
    }
}

fn cmd_columns(config: &Config, input: Option<&Path>, output_format: OutputFormat) -> Result<()> {
    // Resolve against the header only, so a file missing its year or month
    // column can still be diagnosed
    let path = config.data_path(input)?;
    let table = csv_source::load_table(path, config.encoding)?;
    let catalogue = config.catalogue()?;
    let mapping = resolve_columns(table.headers(), &catalogue);

    output::print_columns(output_format, &ColumnsView::from_mapping(&mapping))
}

fn cmd_export(config: &Config, input: Option<&Path>, output: Option<PathBuf>, year: Option<i32>) -> Result<()> {
    let service = DashboardService::open(config, input)?;
    let output = output.unwrap_or_else(|| PathBuf::from("aforo.xlsx"));

    export_to_excel(&service, year, &output)?;
    println!("Exported to {}", output.display());

    Ok(())
}

fn cmd_catalogue(config: &Config, output: Option<&Path>) -> Result<()> {
    let content = catalogue_loader::to_toml(&config.catalogue()?)?;

    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("Catalogue written to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_data: Option<PathBuf>,
    set_encoding: Option<SourceEncoding>,
    set_catalogue: Option<PathBuf>,
    set_horizon: Option<usize>,
    set_output: Option<OutputFormat>,
    set_bind: Option<String>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(path) = set_data {
        config.data_path = Some(path);
        modified = true;
    }

    if let Some(encoding) = set_encoding {
        config.encoding = encoding;
        modified = true;
    }

    if let Some(path) = set_catalogue {
        // Refuse a catalogue that would fail on every later run
        catalogue_loader::load_from_file(&path)?;
        config.catalogue_path = Some(path);
        modified = true;
    }

    if let Some(horizon) = set_horizon {
        config.forecast_horizon = horizon;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(addr) = set_bind {
        config.bind_addr = addr;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
