//! Chief CLI binary entry point.

use anyhow::Result;
use chief_cli::cli::{self, init_logging};
use chief_cli::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // usage errors exit 1 like every other failure; help and version exit 0
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(i32::from(e.use_stderr()));
        }
    };
    let config = cli.build_config();
    init_logging(&config);

    let unattended = cli.is_unattended();

    match cli.execute_with_config(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            if !(unattended && error_ctx.is_silent_when_unattended()) {
                error_ctx.display();
            }
            std::process::exit(1);
        }
    }
}
