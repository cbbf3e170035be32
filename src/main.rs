mod app;
mod cli;
mod config;
mod logging;
mod output;

use clap::Parser;

use cli::{Cli, parse_command};
use config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let cli = cli.with_config(&Config::load());
    let command = parse_command(cli.command);

    if let Err(e) = app::run(&cli, command).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
