//! aloe-clangd - clangd for a recipe's sources, inside its build sandbox

use aloe_support::cli::{self, ClangdCli};
use aloe_support::error::{AloeError, AloeResult};
use aloe_support::process::SystemRunner;
use aloe_support::tools::editor::{self, EditorSession};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::parse_args::<ClangdCli>(ClangdCli::USAGE) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli::init_logging(cli.common.verbose);

    cli::finish(run(cli).await)
}

async fn run(cli: ClangdCli) -> AloeResult<i32> {
    if !cli.ignored.is_empty() {
        debug!("Ignoring extra arguments: {:?}", cli.ignored);
    }

    let config = cli::load_config(&cli.common).await?;

    let source_dir = std::env::current_dir()
        .map_err(|e| AloeError::io("getting current directory", e))?;

    let project_root = match cli.project_root.or_else(|| config.editor.project_root.clone()) {
        Some(root) => root,
        None => {
            let exe = std::env::current_exe()
                .map_err(|e| AloeError::io("locating executable", e))?;
            editor::project_root_from_exe(&exe)?
        }
    };

    let session = EditorSession {
        recipe_context: cli.package,
        source_name: cli.source,
        source_dir,
        project_root,
    };

    editor::launch(&SystemRunner::new(), &config, &session).await
}
