use clap::{Parser, ValueHint};
use std::path::PathBuf;
use tracing::Level;

/// Telehealth need analysis for Texas counties
#[derive(Parser, Debug)]
#[command(name = "telehealth-need", version, about)]
pub struct Cli {
    /// Increase diagnostic output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding the four source extracts
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// Directory to place the chart pages in (defaults to a fresh temporary directory)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: Option<PathBuf>,

    /// Print the summary only, without rendering charts
    #[arg(long)]
    pub no_charts: bool,
}

impl Cli {
    /// Map the -v count onto a tracing level.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

/// Install the stderr subscriber for diagnostics.
pub fn init_tracing(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        let cli = Cli::parse_from(["telehealth-need"]);
        assert_eq!(cli.log_level(), Level::WARN);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.out.is_none());

        let cli = Cli::parse_from(["telehealth-need", "-vv", "--root", "data", "--no-charts"]);
        assert_eq!(cli.log_level(), Level::DEBUG);
        assert_eq!(cli.root, PathBuf::from("data"));
        assert!(cli.no_charts);
    }
}
