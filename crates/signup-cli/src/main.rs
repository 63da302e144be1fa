#![forbid(unsafe_code)]

//! Signup form binary entry point.

mod cli;
mod render;
mod session;

use std::io;
use std::sync::Arc;

use signup_core::{FileStorage, FormController, KeyValueStorage, MemoryStorage, SignupConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::{Opts, StorageChoice};
use crate::session::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();

    let storage: Arc<dyn KeyValueStorage> = match &opts.storage {
        StorageChoice::Default => Arc::new(FileStorage::default_for_app("signup")),
        StorageChoice::File(path) => Arc::new(FileStorage::new(path)),
        StorageChoice::Memory => Arc::new(MemoryStorage::new()),
    };
    tracing::debug!(backend = storage.name(), "history storage selected");

    let mut config = SignupConfig::default();
    if let Some(delay) = opts.delay {
        config = config.with_endpoint_delay(delay);
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let form = FormController::builder()
        .config(config)
        .storage(storage)
        .build();
    let session = Session::new(form, rt);

    let stdin = io::stdin();
    if let Err(e) = session.run(stdin.lock(), io::stdout()) {
        eprintln!("I/O error: {e}");
        std::process::exit(1);
    }
}
