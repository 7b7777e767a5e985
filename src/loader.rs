#![cfg(not(tarpaulin_include))]

use std::error::Error;

use crate::record::{HEADER, UserRecord};

/// Parse a CSV export back into records
///
/// Strict counterpart of `downloader::to_csv`: the first line must be the
/// exact table header and every following line must parse into a record.
/// This is what makes the export round-trippable; the lenient, skip-bad-rows
/// behavior belongs to the remote sheet read, not here.
///
/// # Arguments
/// * `content` - CSV text as produced by the exporter
///
/// # Returns
/// * `Result<Vec<UserRecord>, Box<dyn Error>>` - The parsed records or an error
///
/// # Errors
/// * Returns an error on an empty input, a wrong header, or any malformed row
pub fn from_csv(content: &str) -> Result<Vec<UserRecord>, Box<dyn Error>> {
    let mut lines = content.lines();

    let header = lines.next().ok_or("CSV content is empty")?;
    if header != HEADER.join(",") {
        return Err(format!("unexpected CSV header: {}", header).into());
    }

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let fields = parse_csv_row(line);
        let record = UserRecord::from_row(&fields)
            .ok_or_else(|| format!("malformed record on line {}: {}", i + 2, line))?;
        records.push(record);
    }

    Ok(records)
}

// Split one CSV line into fields, honoring quoting and doubled quotes
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        // Doubled quote inside a quoted field
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(current_field);
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    result.push(current_field);
    result
}
