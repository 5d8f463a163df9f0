use vapi_sync_cli::{command, exit_code, init_tracing, run, CliConfig};

#[tokio::main]
async fn main() {
    let matches = command().get_matches();
    let cli = CliConfig::from_matches(&matches);

    init_tracing(cli.verbose, cli.log_json);

    match run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!(error = %err, "migration failed");
            eprintln!("Error: {err:#}");
            std::process::exit(exit_code(&err));
        }
    }
}
