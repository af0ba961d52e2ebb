//! Excel export functionality

use std::path::Path;

use aforo_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::dashboard::{DashboardService, TotalsView};

/// Export summary, tidy records and skipped rows to an Excel file
pub fn export_to_excel(service: &DashboardService, year: Option<i32>, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, service, &service.totals(year))?;

    let tidy_sheet = workbook.add_worksheet();
    write_tidy_sheet(tidy_sheet, service, year)?;

    let skipped_sheet = workbook.add_worksheet();
    write_skipped_sheet(skipped_sheet, service)?;

    workbook.save(output_path).map_err(excel)?;

    Ok(())
}

fn excel(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// One Summary sheet row, laid out before anything is written
#[derive(Debug, Clone, PartialEq)]
enum Line {
    Heading(String),
    Text(String, String),
    Number(String, f64),
    Total(f64),
    Blank,
}

impl Line {
    fn text(label: &str, value: impl Into<String>) -> Self {
        Line::Text(label.to_string(), value.into())
    }

    fn number(label: &str, value: f64) -> Self {
        Line::Number(label.to_string(), value)
    }
}

/// Selection facts first, then quality counts, which always cover the
/// whole source file since skipped rows may not have a usable year
fn summary_lines(service: &DashboardService, totals: &TotalsView) -> Vec<Line> {
    let quality = service.quality();
    let source = service
        .dataset()
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let year = totals
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "All".to_string());

    let mut lines = vec![
        Line::Heading("Toll-booth Vehicle Counts".to_string()),
        Line::Blank,
        Line::text("Source:", source),
        Line::text("Year:", year),
        Line::number("Records in selection:", service.records(totals.year).len() as f64),
        Line::Blank,
        Line::Heading(QUALITY_HEADING.to_string()),
        Line::number("Source rows:", quality.source_rows as f64),
        Line::number("Tidy records:", quality.records as f64),
        Line::number("Skipped rows:", quality.skipped_rows.len() as f64),
        Line::number("Dropped cells:", quality.dropped_cells as f64),
        Line::Blank,
        Line::Heading("Totals by vehicle type".to_string()),
    ];
    lines.extend(totals.totals.iter().map(|t| Line::Number(t.category.clone(), t.total)));
    lines.push(Line::Total(totals.grand_total));

    if !totals.by_entity.is_empty() {
        lines.push(Line::Blank);
        lines.push(Line::Heading("Totals by station".to_string()));
        lines.extend(totals.by_entity.iter().map(|e| Line::Number(e.entity_id.clone(), e.total)));
    }
    lines
}

const QUALITY_HEADING: &str = "Data quality (whole file)";

fn write_summary_sheet(sheet: &mut Worksheet, service: &DashboardService, totals: &TotalsView) -> Result<()> {
    sheet.set_name("Summary").map_err(excel)?;

    let header_format = Format::new().set_bold();

    for (row, line) in summary_lines(service, totals).iter().enumerate() {
        let row = row as u32;
        match line {
            Line::Heading(title) => {
                sheet.write_string_with_format(row, 0, title, &header_format).map_err(excel)?;
            }
            Line::Text(label, value) => {
                sheet.write_string(row, 0, label).map_err(excel)?;
                sheet.write_string(row, 1, value).map_err(excel)?;
            }
            Line::Number(label, value) => {
                sheet.write_string(row, 0, label).map_err(excel)?;
                sheet.write_number(row, 1, *value).map_err(excel)?;
            }
            Line::Total(value) => {
                sheet.write_string_with_format(row, 0, "Total", &header_format).map_err(excel)?;
                sheet.write_number(row, 1, *value).map_err(excel)?;
            }
            Line::Blank => {}
        }
    }

    sheet.set_column_width(0, 28).map_err(excel)?;
    sheet.set_column_width(1, 40).map_err(excel)?;

    Ok(())
}

fn write_tidy_sheet(sheet: &mut Worksheet, service: &DashboardService, year: Option<i32>) -> Result<()> {
    sheet.set_name("Tidy").map_err(excel)?;

    let header_format = Format::new().set_bold();
    for (col, header) in ["Entity", "Period", "Vehicle type", "Count"].iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel)?;
    }

    for (row_idx, record) in service.records(year).iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, &record.entity_id).map_err(excel)?;
        sheet
            .write_string(row, 1, record.period.format("%Y-%m-%d").to_string())
            .map_err(excel)?;
        sheet.write_string(row, 2, &record.category).map_err(excel)?;
        sheet.write_number(row, 3, record.count).map_err(excel)?;
    }

    sheet.set_column_width(0, 30).map_err(excel)?;
    sheet.set_column_width(1, 12).map_err(excel)?;
    sheet.set_column_width(2, 16).map_err(excel)?;

    Ok(())
}

fn write_skipped_sheet(sheet: &mut Worksheet, service: &DashboardService) -> Result<()> {
    sheet.set_name("Skipped").map_err(excel)?;

    let header_format = Format::new().set_bold();
    sheet
        .write_string_with_format(0, 0, "Skipped rows (whole file)", &header_format)
        .map_err(excel)?;
    for (col, header) in ["Row", "Year", "Month", "Reason"].iter().enumerate() {
        sheet
            .write_string_with_format(1, col as u16, *header, &header_format)
            .map_err(excel)?;
    }

    for (row_idx, skipped) in service.quality().skipped_rows.iter().enumerate() {
        let row = (row_idx + 2) as u32;
        sheet.write_number(row, 0, skipped.row as f64).map_err(excel)?;
        sheet.write_string(row, 1, &skipped.year).map_err(excel)?;
        sheet.write_string(row, 2, &skipped.month).map_err(excel)?;
        sheet.write_string(row, 3, &skipped.reason).map_err(excel)?;
    }

    sheet.set_column_width(3, 50).map_err(excel)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use aforo_domain::model::Catalogue;
    use aforo_infra::csv_source::parse_table;
    use aforo_infra::forecast::LinearTrendForecaster;
    use std::sync::Arc;

    fn service() -> DashboardService {
        let table = parse_table("NOMBRE,AÑO,MES,AUTOS\nA,2024,ENERO,10\nB,2024,99,5\nA,2023,MARZO,7\n").unwrap();
        let dataset = Dataset::from_table(table, Catalogue::default()).unwrap();
        DashboardService::new(Arc::new(dataset), Box::new(LinearTrendForecaster::default()), 12)
    }

    fn position(lines: &[Line], wanted: &Line) -> usize {
        lines
            .iter()
            .position(|l| l == wanted)
            .unwrap_or_else(|| panic!("missing {:?} in {:?}", wanted, lines))
    }

    #[test]
    fn test_summary_separates_selection_from_whole_file_quality() {
        let service = service();
        let lines = summary_lines(&service, &service.totals(Some(2024)));

        let selected = position(&lines, &Line::number("Records in selection:", 1.0));
        let heading = position(&lines, &Line::Heading(QUALITY_HEADING.to_string()));
        assert!(selected < heading);
        assert!(lines.contains(&Line::text("Year:", "2024")));
        // counts below the heading ignore the year filter
        assert_eq!(lines[heading + 1], Line::number("Source rows:", 3.0));
        assert_eq!(lines[heading + 2], Line::number("Tidy records:", 2.0));
        assert_eq!(lines[heading + 3], Line::number("Skipped rows:", 1.0));
    }

    #[test]
    fn test_summary_lists_stations() {
        let service = service();
        let lines = summary_lines(&service, &service.totals(None));
        let heading = position(&lines, &Line::Heading("Totals by station".to_string()));
        assert_eq!(lines[heading + 1], Line::number("A", 17.0));
        assert_eq!(lines.last(), Some(&Line::number("A", 17.0)));
        assert!(lines.contains(&Line::Total(17.0)));
    }

    #[test]
    fn test_export_writes_workbook() {
        let service = service();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aforos.xlsx");
        export_to_excel(&service, Some(2024), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }
}
