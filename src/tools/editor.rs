//! clangd sessions inside the chariot build sandbox
//!
//! The recipe sources checked out in the current directory are mounted
//! read-only into the sandbox, and clangd is told how to map sandbox paths
//! back to the host so that diagnostics point at the files being edited.

use crate::config::Config;
use crate::error::{AloeError, AloeResult};
use crate::process::{CommandRunner, ToolCommand};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything that varies between sessions
#[derive(Debug, Clone)]
pub struct EditorSession {
    /// Recipe whose build environment hosts clangd
    pub recipe_context: String,
    /// Source name the recipe refers to
    pub source_name: String,
    /// Host directory holding the sources (the invoking cwd)
    pub source_dir: PathBuf,
    pub project_root: PathBuf,
}

/// `<host dir>=<sources var>/<source>`
pub fn path_mapping(source_dir: &Path, sources_var: &str, source_name: &str) -> String {
    format!("{}={}/{}", source_dir.display(), sources_var, source_name)
}

/// `<host dir>=<sources root>/<source>:ro`
pub fn source_mount(source_dir: &Path, sources_root: &str, source_name: &str) -> String {
    format!("{}={}/{}:ro", source_dir.display(), sources_root, source_name)
}

/// The command line run inside the sandbox
pub fn clangd_command_line(mappings: &[String]) -> String {
    format!(
        "clangd --background-index --clang-tidy --header-insertion=iwyu --path-mappings {}",
        mappings.join(",")
    )
}

/// Project root for an executable installed at `exe`: two levels up, the
/// parent of the directory holding the tool.
pub fn project_root_from_exe(exe: &Path) -> AloeResult<PathBuf> {
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or(AloeError::ProjectRootUnknown)
}

/// Assemble the `chariot ... exec` invocation for a session
pub fn session_command(config: &Config, session: &EditorSession) -> ToolCommand {
    let editor = &config.editor;
    let mappings = vec![path_mapping(
        &session.source_dir,
        &editor.sources_var,
        &session.source_name,
    )];

    ToolCommand::new(&config.chariot.program)
        .arg("--config")
        .arg(session.project_root.join(&editor.config_file).to_string_lossy())
        .arg("--cache")
        .arg(config.editor_cache_path().to_string_lossy())
        .arg("--no-lockfile")
        .args(["exec", "--rw"])
        .arg("--recipe-context")
        .arg(&session.recipe_context)
        .arg("-p")
        .arg(&editor.package)
        .arg("-e")
        .arg(format!("HOME={}", editor.home))
        .arg("-e")
        .arg(format!("XDG_CACHE_HOME={}", editor.cache_home))
        .arg("-m")
        .arg(source_mount(
            &session.source_dir,
            &editor.sources_root,
            &session.source_name,
        ))
        .arg(clangd_command_line(&mappings))
}

/// Run a session to completion and return its exit code
pub async fn launch(
    runner: &dyn CommandRunner,
    config: &Config,
    session: &EditorSession,
) -> AloeResult<i32> {
    debug!(
        "Starting clangd for {} ({})",
        session.recipe_context,
        session.source_dir.display()
    );
    let cmd = session_command(config, session);
    let outcome = runner.run(&cmd).await?;
    Ok(outcome.exit_code())
}
