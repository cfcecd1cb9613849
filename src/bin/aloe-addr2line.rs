//! aloe-addr2line - resolve kernel addresses to source locations

use aloe_support::chariot::Chariot;
use aloe_support::cli::{self, Addr2lineCli};
use aloe_support::error::AloeResult;
use aloe_support::process::SystemRunner;
use aloe_support::tools::symbols;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::parse_args::<Addr2lineCli>(Addr2lineCli::USAGE) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::init_logging(cli.common.verbose);

    cli::finish(run(cli).await)
}

async fn run(cli: Addr2lineCli) -> AloeResult<i32> {
    let addresses = cli
        .addresses
        .iter()
        .map(|a| symbols::parse_address(a))
        .collect::<AloeResult<Vec<_>>>()?;

    let config = cli::load_config(&cli.common).await?;
    let runner = SystemRunner::new();
    let chariot = Chariot::new(&runner, &config.chariot);

    symbols::resolve_symbols(&runner, &chariot, &config.symbols, &addresses).await
}
