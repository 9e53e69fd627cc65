use crate::forecast::ForecastPoint;
#[cfg(feature = "web")]
use std::error::Error;

/// Header row shared by the CSV and XLSX exports
pub const EXPORT_HEADERS: [&str; 3] = ["Month", "Predicted Sales", "Sales Based On Market Investments"];

/// Convert a forecast to CSV format
///
/// One row per projected month. Labels containing commas, quotes or
/// newlines are quoted with embedded quotes doubled.
///
/// # Examples
/// ```
/// use forecast::downloader::to_csv;
/// use forecast::forecast::ForecastPoint;
///
/// let points = vec![ForecastPoint {
///     label: "Jan 2027".to_string(),
///     predicted: 1050.0,
///     marketing: 1100.5,
/// }];
/// let csv = to_csv(&points);
/// assert!(csv.ends_with("Jan 2027,1050.00,1100.50\n"));
/// ```
pub fn to_csv(points: &[ForecastPoint]) -> String {
    let mut csv_content = EXPORT_HEADERS.join(",");
    csv_content.push('\n');

    for point in points {
        csv_content.push_str(&escape_csv(&point.label));
        csv_content.push_str(&format!(",{:.2},{:.2}\n", point.predicted, point.marketing));
    }

    csv_content
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Convert a forecast to XLSX format
///
/// Writes the header row followed by one row per month into a single
/// worksheet and returns the workbook bytes.
#[cfg(feature = "web")]
pub fn to_xlsx(points: &[ForecastPoint]) -> Result<Vec<u8>, Box<dyn Error>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Forecast")?;

    for (c, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header)?;
    }

    for (r, point) in points.iter().enumerate() {
        let row = (r + 1) as u32;
        worksheet.write_string(row, 0, point.label.as_str())?;
        worksheet.write_number(row, 1, point.predicted)?;
        worksheet.write_number(row, 2, point.marketing)?;
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<ForecastPoint> {
        vec![
            ForecastPoint {
                label: "Nov 2026".to_string(),
                predicted: 1050.0,
                marketing: 1113.0,
            },
            ForecastPoint {
                label: "Dec, 2026".to_string(),
                predicted: 1102.5,
                marketing: 1168.65,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = to_csv(&points());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Month,Predicted Sales,Sales Based On Market Investments");
        assert_eq!(lines[1], "Nov 2026,1050.00,1113.00");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn csv_quotes_labels_with_commas() {
        let csv = to_csv(&points());
        assert!(csv.contains("\"Dec, 2026\",1102.50,1168.65"));
    }

    #[test]
    fn empty_forecast_is_just_the_header() {
        assert_eq!(to_csv(&[]), "Month,Predicted Sales,Sales Based On Market Investments\n");
    }

    #[cfg(feature = "web")]
    #[test]
    fn xlsx_is_a_zip_container() {
        let bytes = to_xlsx(&points()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
