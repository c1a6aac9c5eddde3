// src/main.rs

use airflow_ext::errors::ExtensionError;
use airflow_ext::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        let code = match err.downcast_ref::<ExtensionError>() {
            // The child's stderr has already been replayed through the log.
            Some(ExtensionError::Process(process)) => process.exit_code(),
            _ => {
                eprintln!("airflow_extension error: {err:?}");
                1
            }
        };
        std::process::exit(code);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_options())?;
    run(args).await?;
    Ok(())
}
