//! aloe-qemu - boot the kernel image paused under QEMU for debugging

use aloe_support::chariot::Chariot;
use aloe_support::cli::{self, QemuCli};
use aloe_support::error::AloeResult;
use aloe_support::process::SystemRunner;
use aloe_support::tools::vm::{self, RunOptions};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::parse_args::<QemuCli>(QemuCli::USAGE) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::init_logging(cli.common.verbose);

    cli::finish(run(cli).await)
}

async fn run(cli: QemuCli) -> AloeResult<i32> {
    let config = cli::load_config(&cli.common).await?;
    let runner = SystemRunner::new();
    let chariot = Chariot::new(&runner, &config.chariot);

    let options = RunOptions {
        no_font: cli.no_font,
        dry_run: cli.dry_run,
    };

    // Interrupted runs end normally.
    vm::run_vm(&runner, &chariot, &config, options).await?;
    Ok(0)
}
