use std::path::{Path, PathBuf};

/// Constants describing the single state this run is fixed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateProfile {
    /// Two-digit state FIPS code, e.g. "48".
    pub fips: String,
    /// Geography label used by the CMS telehealth extract, e.g. "Texas".
    pub name: String,
    /// Suffix stripped from SAHIE county names, e.g. " County, TX".
    pub name_suffix: String,
}

impl StateProfile {
    pub fn texas() -> Self {
        Self {
            fips: "48".to_string(),
            name: "Texas".to_string(),
            name_suffix: " County, TX".to_string(),
        }
    }
}

/// Source file locations, resolved once at startup and passed into every loader.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub state: StateProfile,
    pub shapefile: PathBuf,
    pub sahie: PathBuf,
    pub saipe: PathBuf,
    pub telehealth: PathBuf,
}

impl Config {
    /// Texas configuration with the fixed 2018/2023/2025 file vintages under `root`.
    pub fn texas(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            state: StateProfile::texas(),
            shapefile: root.join("cb_2018_48_cousub_500k/cb_2018_48_cousub_500k.shp"),
            sahie: root.join("SAHIE_12-04-2025.csv"),
            saipe: root.join("saipe_tx_23.txt"),
            telehealth: root
                .join("Medicare Telehealth Trends")
                .join("Medicare Telehealth Trends")
                .join("2025-Q1")
                .join("TMEDTREND_PUBLIC_250827.csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texas_paths_are_relative_to_root() {
        let config = Config::texas(Path::new("/data"));
        assert_eq!(config.state.fips, "48");
        assert_eq!(config.sahie, Path::new("/data/SAHIE_12-04-2025.csv"));
        assert!(config.shapefile.ends_with("cb_2018_48_cousub_500k.shp"));
        assert!(config.telehealth.starts_with("/data/Medicare Telehealth Trends"));
    }
}
