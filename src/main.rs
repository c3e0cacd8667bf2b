use anyhow::Result;
use clap::Parser;

use telehealth_need::cli::{self, Cli};
use telehealth_need::{pipeline, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(cli.log_level());

    let config = Config::texas(&cli.root);
    let stdout = std::io::stdout();
    pipeline::run(&config, cli.out.clone(), !cli.no_charts, &mut stdout.lock())
}
