use std::io;
use std::sync::Arc;

use tracing::error;

use tally_client::{ClientConfig, MenuExit, run_menu, send_file};
use tally_transfer::{TracingLogger, TransferLogger};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they don't interleave with the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_client=warn,tally_transfer=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = match ClientConfig::from_args(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let logger: Arc<dyn TransferLogger> = Arc::new(TracingLogger);
    let exit = run_menu(io::stdin().lock(), io::stdout().lock(), |path| {
        send_file(&config, path, logger.clone())
    })?;

    match exit {
        MenuExit::Quit => Ok(()),
        MenuExit::Fatal(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
