use chrono::NaiveDate;

use crate::record::{HEADER, UserRecord};

/// Convert stored records to CSV
///
/// The output is UTF-8, one header line plus one line per record, columns in
/// the table's `timestamp,name,age,favorite_genre` order. Fields containing
/// commas, quotes or newlines are quoted, with inner quotes doubled.
///
/// # Arguments
/// * `records` - The records to export, in insertion order
///
/// # Returns
/// * `String` - The CSV content
///
/// # Examples
/// ```
/// use moviepoll::downloader::to_csv;
/// use moviepoll::record::{Genre, UserRecord};
///
/// let csv = to_csv(&[UserRecord::new("Ada", 30, Genre::SciFi)]);
/// assert_eq!(csv.lines().count(), 2);
/// ```
pub fn to_csv(records: &[UserRecord]) -> String {
    let mut content = String::new();

    content.push_str(&HEADER.join(","));
    content.push('\n');

    for record in records {
        let row = record.to_row();
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                content.push(',');
            }
            content.push_str(&escape_field(field));
        }
        content.push('\n');
    }

    content
}

/// File name for a CSV download, stamped with the given date.
pub fn export_filename(date: NaiveDate) -> String {
    format!("user_records_{}.csv", date.format("%Y-%m-%d"))
}

// Quote a field when it carries a separator, a quote or a newline
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}
