use clap::Parser;
use flipscan::cli::{check, output, run, sources, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let Cli { config, command } = Cli::parse();
    let config = config.as_deref();

    let result = match command {
        Commands::Run(args) => run::execute(config, args).await,
        Commands::Sources => sources::execute(config),
        Commands::Check => check::execute(config),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
