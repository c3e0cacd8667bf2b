use anyhow::{ensure, Context, Result};
use polars::frame::DataFrame;
use tracing::{debug, info};

use crate::{common, config::{Config, StateProfile}, types::CountyId};

/// Preamble lines above the header row of the SAHIE extract.
pub const SAHIE_PREAMBLE_ROWS: usize = 3;

/// Positional names for the 9 SAHIE columns.
pub const SAHIE_COLUMNS: [&str; 9] = [
    "Year", "ID", "Name", "Uninsured_Number", "Uninsured_MOE",
    "Uninsured_Pct", "Pct_MOE", "Demographic_Number", "Demographic_MOE",
];

/// County uninsured rate from the SAHIE extract.
#[derive(Debug, Clone, PartialEq)]
pub struct UninsuredRecord {
    pub id: CountyId,
    pub name: String,
    pub uninsured_pct: f64,
}

/// Load county uninsured rates for the configured state.
pub fn load_uninsured(config: &Config) -> Result<Vec<UninsuredRecord>> {
    common::require_file_exists(&config.sahie)?;
    let df = common::read_csv_file_as_strings(&config.sahie, SAHIE_PREAMBLE_ROWS)?;
    let records = uninsured_from_dataframe(df, &config.state)
        .with_context(|| format!("Malformed SAHIE extract: {}", config.sahie.display()))?;

    info!("[load_uninsured] {} county uninsured records", records.len());
    Ok(records)
}

/// Rename the 9 columns positionally, keep the state's county rows and coerce the percentage.
/// Rows whose percentage is not numeric are dropped.
pub fn uninsured_from_dataframe(mut df: DataFrame, state: &StateProfile) -> Result<Vec<UninsuredRecord>> {
    ensure!(
        df.width() == SAHIE_COLUMNS.len(),
        "expected {} columns, found {}", SAHIE_COLUMNS.len(), df.width()
    );
    df.set_column_names(SAHIE_COLUMNS)?;

    let ids = df.column("ID")?.str()?;
    let names = df.column("Name")?.str()?;
    let pcts = df.column("Uninsured_Pct")?.str()?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for ((id, name), pct) in ids.into_iter().zip(names).zip(pcts) {
        let Some(id) = id.map(CountyId::padded) else { continue };
        if !id.is_county_of(&state.fips) { continue }

        let uninsured_pct = pct
            .and_then(|p| p.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite());

        match (uninsured_pct, name) {
            (Some(uninsured_pct), Some(name)) => records.push(UninsuredRecord {
                id,
                name: name.replace(state.name_suffix.as_str(), ""),
                uninsured_pct,
            }),
            _ => {
                debug!("[load_uninsured] dropping {id}: missing uninsured percentage or name");
                dropped += 1;
            }
        }
    }

    if dropped > 0 { info!("[load_uninsured] dropped {dropped} county rows with missing values") }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Year,ID,Name,Number Uninsured,Number MOE,Percent Uninsured,Percent MOE,Demographic Group,Demographic MOE\n";

    fn sahie_bytes(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from("Small Area Health Insurance Estimates\nTexas all ages\nRelease 2025\n");
        text.push_str(HEADER);
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.into_bytes()
    }

    fn load(rows: &[&str]) -> Vec<UninsuredRecord> {
        let df = common::read_csv_bytes_as_strings(&sahie_bytes(rows), SAHIE_PREAMBLE_ROWS).unwrap();
        uninsured_from_dataframe(df, &StateProfile::texas()).unwrap()
    }

    #[test]
    fn county_rows_are_kept_and_names_cleaned() {
        let records = load(&[
            r#"2022,48,"Texas",4900000,10000,16.6,0.2,29000000,0"#,
            r#"2022,48001,"Anderson County, TX",7000,800,19.7,2.1,35000,0"#,
            r#"2022,48061,"Cameron County, TX",90000,3000,21.3,0.8,420000,0"#,
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "48001");
        assert_eq!(records[0].name, "Anderson");
        assert!((records[0].uninsured_pct - 19.7).abs() < 1e-9);
        assert_eq!(records[1].name, "Cameron");
    }

    #[test]
    fn non_numeric_percentages_and_foreign_ids_are_dropped() {
        let records = load(&[
            r#"2022,48003,"Andrews County, TX",2000,300,N/A,1.0,18000,0"#,
            r#"2022,4801,"Short Id County, TX",1,1,10.0,1.0,1,0"#,
            r#"2022,06001,"Alameda County, CA",1,1,5.0,1.0,1,0"#,
            r#"2022,48005,"Angelina County, TX",14000,1200,,1.5,70000,0"#,
            r#"2022,48007,"Aransas County, TX",3000,400,15.2,2.0,20000,0"#,
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "48007");
    }

    #[test]
    fn wrong_column_count_is_an_error() {
        let bytes = b"a\nb\nc\nYear,ID,Name\n2022,48001,x\n";
        let df = common::read_csv_bytes_as_strings(bytes, SAHIE_PREAMBLE_ROWS).unwrap();
        assert!(uninsured_from_dataframe(df, &StateProfile::texas()).is_err());
    }
}
