//! aloe-initrd - build the init program and package build/aloe.initrd

use aloe_support::cli::{self, InitrdCli};
use aloe_support::error::{AloeError, AloeResult};
use aloe_support::process::SystemRunner;
use aloe_support::tools::initrd;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::parse_args::<InitrdCli>(InitrdCli::USAGE) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::init_logging(cli.common.verbose);

    cli::finish(run(cli).await)
}

async fn run(cli: InitrdCli) -> AloeResult<i32> {
    let config = cli::load_config(&cli.common).await?;

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()
            .map_err(|e| AloeError::io("getting current directory", e))?,
    };

    initrd::package(&SystemRunner::new(), &config.initrd, &root, cli.force).await?;
    Ok(0)
}
