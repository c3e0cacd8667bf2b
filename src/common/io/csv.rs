use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};

/// CSV options shared by every tabular source: header row after `skip_rows`
/// preamble lines, every column kept as String so identifiers keep their
/// leading zeros and coercion stays under the loader's control.
fn string_csv_options(skip_rows: usize) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(skip_rows)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po
            .with_truncate_ragged_lines(true))
}

/// Reads a CSV file from `path` into a DataFrame of String columns.
pub(crate) fn read_csv_file_as_strings(path: &Path, skip_rows: usize) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    string_csv_options(skip_rows)
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Reads CSV bytes into a DataFrame of String columns.
#[cfg(test)]
pub(crate) fn read_csv_bytes_as_strings(bytes: &[u8], skip_rows: usize) -> Result<DataFrame> {
    Ok(string_csv_options(skip_rows)
        .into_reader_with_file_handle(std::io::Cursor::new(bytes))
        .finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    #[test]
    fn preamble_is_skipped_and_columns_stay_strings() {
        let bytes = b"title line\nsource: census\nnotes\nYear,ID,Pct\n2022,48001,12.5\n2022,01001,9.0\n";
        let df = read_csv_bytes_as_strings(bytes, 3).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("ID").unwrap().dtype(), &DataType::String);

        let ids = df.column("ID").unwrap().str().unwrap()
            .into_iter()
            .map(|id| id.unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["48001", "01001"]);
    }

    #[test]
    fn missing_file_is_an_error_with_path() {
        let err = read_csv_file_as_strings(Path::new("/definitely/missing.csv"), 0).unwrap_err();
        assert!(format!("{err:#}").contains("missing.csv"));
    }
}
