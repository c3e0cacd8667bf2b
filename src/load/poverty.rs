use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{common, config::Config, types::CountyId};

/// Fewest whitespace tokens a county line can have (median income is token 20).
const MIN_TOKENS: usize = 21;
const POVERTY_RATE_TOKEN: usize = 5;
const CHILD_POVERTY_TOKEN: usize = 11;
const MEDIAN_INCOME_TOKEN: usize = 20;

/// County poverty and income estimates from the SAIPE text extract.
#[derive(Debug, Clone, PartialEq)]
pub struct PovertyRecord {
    pub id: CountyId,
    pub name: String,
    pub poverty_rate: f64,
    pub child_poverty_rate: f64,
    pub median_income: i64,
}

/// Parsed records plus the number of lines that were skipped.
#[derive(Debug, Clone, Default)]
pub struct PovertyLoad {
    pub records: Vec<PovertyRecord>,
    pub skipped: usize,
}

/// Load county poverty/income rows for the configured state.
pub fn load_poverty(config: &Config) -> Result<PovertyLoad> {
    common::require_file_exists(&config.saipe)?;
    let file = File::open(&config.saipe)
        .with_context(|| format!("Failed to read SAIPE file: {}", config.saipe.display()))?;

    let load = parse_poverty(BufReader::new(file), &config.state.fips)
        .with_context(|| format!("Failed to read SAIPE file: {}", config.saipe.display()))?;

    info!("[load_poverty] {} county poverty records ({} lines skipped)", load.records.len(), load.skipped);
    Ok(load)
}

/// Parse every line of a SAIPE extract. Lines that don't describe a county of
/// `state_fips`, or that fail to parse, are skipped; read errors are fatal.
pub fn parse_poverty<R: BufRead>(reader: R, state_fips: &str) -> Result<PovertyLoad> {
    let mut load = PovertyLoad::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_poverty_line(&line, state_fips) {
            Some(record) => load.records.push(record),
            None => {
                if !line.trim().is_empty() { debug!("[load_poverty] skipping line {}", number + 1) }
                load.skipped += 1;
            }
        }
    }
    Ok(load)
}

/// Parse one SAIPE line into a county record.
///
/// Returns None for short lines, other states, the state-level row (county code "0")
/// and lines whose numeric tokens don't parse.
pub fn parse_poverty_line(line: &str, state_fips: &str) -> Option<PovertyRecord> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    if tokens.len() < MIN_TOKENS || tokens[0] != state_fips || tokens[1] == "0" {
        return None;
    }

    let poverty_rate = parse_finite(tokens[POVERTY_RATE_TOKEN])?;
    let child_poverty_rate = parse_finite(tokens[CHILD_POVERTY_TOKEN])?;
    let median_income = tokens[MEDIAN_INCOME_TOKEN].parse::<i64>().ok()?;

    let name = county_name(&tokens)
        .unwrap_or_else(|| format!("County {}", tokens[1]));

    Some(PovertyRecord {
        id: CountyId::from_parts(state_fips, tokens[1]),
        name,
        poverty_rate,
        child_poverty_rate,
        median_income,
    })
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A name word: word characters only, with at least one letter (so numeric columns never match).
fn is_name_word(token: &str) -> bool {
    token.chars().all(|c| c.is_alphanumeric() || c == '_')
        && token.chars().any(char::is_alphabetic)
}

/// The run of name words immediately preceding the first "County" token that has one,
/// e.g. `... 52912 Palo Pinto County TX ...` -> "Palo Pinto".
fn county_name(tokens: &[&str]) -> Option<String> {
    tokens.iter().enumerate()
        .filter(|&(_, &token)| token == "County")
        .find_map(|(i, _)| {
            let start = tokens[..i].iter()
                .rposition(|token| !is_name_word(token))
                .map_or(0, |p| p + 1);
            (start < i).then(|| tokens[start..i].join(" "))
        })
}
