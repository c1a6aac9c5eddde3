// src/bin/airflow_invoker.rs

//! Pass-through binary: `airflow_invoker <args..>` behaves like
//! `airflow <args..>` after the extension's pre-invoke hooks.

use airflow_ext::config::ProcessEnv;
use airflow_ext::errors::ExtensionError;
use airflow_ext::extension::AirflowExtension;
use airflow_ext::logging::{self, LogOptions};

#[tokio::main]
async fn main() {
    if let Err(err) = logging::init_logging(LogOptions::from_env(&ProcessEnv)) {
        eprintln!("airflow_invoker error: {err:?}");
        std::process::exit(1);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match AirflowExtension::from_env() {
        Ok(ext) => ext.pass_through(&args).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        // A failed child has already had its stderr replayed through the log.
        if !matches!(err, ExtensionError::Process(_)) {
            eprintln!("airflow_invoker error: {err}");
        }
        std::process::exit(err.exit_code());
    }
}
