//! Output formatting module

use std::io;

use aforo_app::dashboard::{ColumnsView, ForecastView, QualityView, TotalsView};
use aforo_domain::forecast::ForecastOutcome;
use aforo_domain::model::TidyRecord;
use aforo_infra::tidy_writer::{format_count, write_tidy_csv};
use aforo_types::{OutputFormat, Result};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_csv_rows<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Tidy records; table format is the tidy CSV itself
pub fn print_records(output_format: OutputFormat, records: &[TidyRecord]) -> Result<()> {
    match output_format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Table | OutputFormat::Csv => write_tidy_csv(io::stdout(), records),
    }
}

pub fn print_columns(output_format: OutputFormat, view: &ColumnsView) -> Result<()> {
    match output_format {
        OutputFormat::Json => print_json(view),
        OutputFormat::Csv => write_csv_rows(&view.resolved),
        OutputFormat::Table => {
            println!("\nColumn Mapping");
            println!("==============");
            for r in &view.resolved {
                println!("{:<20} {:<32} ({:?})", r.field.to_string(), r.column, r.source);
            }
            if !view.unresolved.is_empty() {
                println!("\nNo column found for: {}", view.unresolved.join(", "));
            }
            Ok(())
        }
    }
}

pub fn print_totals(output_format: OutputFormat, totals: &TotalsView, quality: &QualityView) -> Result<()> {
    match output_format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Summary<'a> {
                #[serde(flatten)]
                totals: &'a TotalsView,
                quality: &'a QualityView,
            }
            print_json(&Summary { totals, quality })
        }
        OutputFormat::Csv => write_csv_rows(&totals.totals),
        OutputFormat::Table => {
            let year = totals
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "all years".to_string());

            println!("\nVehicle Totals ({})", year);
            println!("==============================");
            for t in &totals.totals {
                println!("{:<20} {:>14}", t.category, format_count(t.total));
            }
            println!("------------------------------");
            println!("{:<20} {:>14}", "Total", format_count(totals.grand_total));

            if let Some(ex) = &totals.extremes {
                println!("\nBusiest:  {} ({})", ex.busiest.category, format_count(ex.busiest.total));
                println!("Quietest: {} ({})", ex.quietest.category, format_count(ex.quietest.total));
            }

            if totals.by_entity.len() > 1 {
                println!("\nBy station");
                for e in &totals.by_entity {
                    println!("{:<20} {:>14}", e.entity_id, format_count(e.total));
                }
            }

            println!(
                "\nRows: {}  Records: {}  Skipped rows: {}  Dropped cells: {}",
                quality.source_rows,
                quality.records,
                quality.skipped_rows.len(),
                quality.dropped_cells
            );
            Ok(())
        }
    }
}

pub fn print_forecast(output_format: OutputFormat, view: &ForecastView) -> Result<()> {
    match output_format {
        OutputFormat::Json => print_json(view),
        OutputFormat::Csv => write_csv_rows(&view.forecast.clone().into_points()?),
        OutputFormat::Table => {
            println!("\nMonthly Traffic Forecast");
            println!("========================");
            println!("History: {} months", view.history.len());
            if let Some(last) = view.history.last() {
                println!("Last observed: {} ({})", last.period.format("%Y-%m"), format_count(last.total));
            }

            match &view.forecast {
                ForecastOutcome::Available { points } => {
                    println!("\n{:<10} {:>14} {:>14} {:>14}", "Period", "Forecast", "Lower", "Upper");
                    for p in points {
                        println!(
                            "{:<10} {:>14.0} {:>14.0} {:>14.0}",
                            p.period.format("%Y-%m"),
                            p.value,
                            p.lower,
                            p.upper
                        );
                    }
                }
                ForecastOutcome::Unavailable { reason } => {
                    println!("\nForecast unavailable: {}", reason);
                }
            }
            Ok(())
        }
    }
}
