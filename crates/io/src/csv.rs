// CSV/TSV source reading

use std::io::Read;
use std::path::Path;

use crate::error::ExtractError;
use crate::table::{Cell, Table};

pub fn read_table(path: &Path) -> Result<Table, ExtractError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    read_table_from_str(&content, delimiter)
}

/// Pick the delimiter of a vendor export from its header line.
///
/// Vendor lists come out of Excel as comma, semicolon (European locales) or
/// tab separated. The candidate splitting the header into the most fields
/// wins; ties and single-column headers fall back to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .map(|delim| (delim, header_fields(header, delim)))
        .filter(|&(_, fields)| fields > 1)
        .fold((b',', 1), |best, cand| if cand.1 > best.1 { cand } else { best })
        .0
}

/// Field count of `line` under `delim`, ignoring delimiters inside quotes.
fn header_fields(line: &str, delim: u8) -> usize {
    let mut in_quotes = false;
    let mut fields = 1;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delim && !in_quotes {
            fields += 1;
        }
    }
    fields
}

/// Read file and convert to UTF-8 if needed (Excel-exported CSVs are often Windows-1252)
fn read_file_as_utf8(path: &Path) -> Result<String, ExtractError> {
    let mut file = std::fs::File::open(path).map_err(|e| ExtractError::Csv(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ExtractError::Csv(e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn read_table_from_str(content: &str, delimiter: u8) -> Result<Table, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ExtractError::Csv(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Table::from_rows(rows))
}
