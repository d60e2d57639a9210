use clap::Parser;

use roi::cli::{Cli, CliError, Command, run_calc};

#[tokio::main]
async fn main() {
    roi::telemetry::init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Calc(args) => run_calc(&args).map(|out| print!("{out}")),
        Command::Serve(args) => match args.into_config() {
            Ok(config) => roi::api::run_http_server(config)
                .await
                .map_err(CliError::from),
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
