use clap::Parser;
use eyre::WrapErr;
use runway::{error_annotation, Cli, Pipeline, RunOutcome};
use runway_config::{CiEnvironment, ConfigLoader};
use runway_core::EnvExports;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = runway_utils::tracing::init() {
        eprintln!("failed to initialize logging: {e}");
    }
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    let cli = Cli::parse();

    // Holding the result keeps the server handle alive until exit.
    let result = run(cli).await;
    let code = match &result {
        Ok(outcome) => {
            if let Some(server) = &outcome.server {
                info!(label = server.label(), pid = ?server.pid(), "leaving server running");
            }
            0
        }
        Err(report) => {
            error!("{report:?}");
            println!("{}", error_annotation(&format!("{report:#}")));
            1
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> eyre::Result<RunOutcome> {
    let config = ConfigLoader::new(cli.action_inputs())
        .load()
        .wrap_err("invalid configuration")?;
    let ci = CiEnvironment::from_env();
    let exports = EnvExports::from_process_env();

    Pipeline::new(config, ci, exports)?.run().await
}
