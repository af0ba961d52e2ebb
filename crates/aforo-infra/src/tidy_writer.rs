//! Long-format CSV output

use std::fs::File;
use std::io::Write;
use std::path::Path;

use aforo_domain::model::TidyRecord;
use aforo_types::Result;

pub const TIDY_HEADER: [&str; 4] = ["entity_id", "period", "category", "count"];

/// Write tidy records as `entity_id,period,category,count`
pub fn write_tidy_csv<W: Write>(writer: W, records: &[TidyRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(TIDY_HEADER)?;
    for r in records {
        let period = r.period.format("%Y-%m-%d").to_string();
        let count = format_count(r.count);
        wtr.write_record([
            r.entity_id.as_str(),
            period.as_str(),
            r.category.as_str(),
            count.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_tidy_csv_file(path: &Path, records: &[TidyRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_tidy_csv(file, records)
}

/// Whole counts without a trailing ".0"
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 && count.abs() < 1e15 {
        format!("{}", count as i64)
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_write_tidy_csv() {
        let records = vec![
            TidyRecord {
                entity_id: "Caseta, Norte".into(),
                period: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                category: "Automobile".into(),
                count: 1500.0,
            },
            TidyRecord {
                entity_id: "Toll-5".into(),
                period: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                category: "Motorcycle".into(),
                count: 2.5,
            },
        ];
        let mut out = Vec::new();
        write_tidy_csv(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "entity_id,period,category,count\n\
             \"Caseta, Norte\",2024-03-01,Automobile,1500\n\
             Toll-5,2024-04-01,Motorcycle,2.5\n"
        );
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tidy.csv");
        write_tidy_csv_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "entity_id,period,category,count\n");
    }
}
