//! Chariot build/cache tool client
//!
//! Chariot maps a recipe identifier to its built output directory, building
//! the recipe first when the cache is stale. These tools only consume that
//! contract; nothing here knows how recipes are built.

use crate::config::schema::ChariotConfig;
use crate::error::{AloeError, AloeResult};
use crate::process::{CommandRunner, ToolCommand};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A buildable unit understood by chariot, e.g. `package/aloe`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RecipeId {
    type Err = AloeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(AloeError::RecipeInvalid(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a list of recipe identifiers from configuration
pub fn parse_recipes<S: AsRef<str>>(recipes: &[S]) -> AloeResult<Vec<RecipeId>> {
    recipes.iter().map(|r| r.as_ref().parse()).collect()
}

/// Resolves recipes to built artifact directories
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Output directory of `recipe`, building it if necessary
    async fn resolve(&self, recipe: &RecipeId) -> AloeResult<PathBuf>;

    /// Bring `recipes` up to date. A failed build is an error only when
    /// `fail_on_error` is set.
    async fn ensure_built(&self, recipes: &[RecipeId], fail_on_error: bool) -> AloeResult<()>;
}

/// [`PathResolver`] backed by the chariot CLI
pub struct Chariot<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    cache_path: PathBuf,
}

impl<'a> Chariot<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &ChariotConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            cache_path: config.cache_path.clone(),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg("--cache")
            .arg(self.cache_path.to_string_lossy())
    }

    /// `chariot --cache <cache> path <recipe>`
    pub fn path_command(&self, recipe: &RecipeId) -> ToolCommand {
        self.command().arg("path").arg(recipe.as_str())
    }

    /// `chariot --cache <cache> build <recipe>...`
    pub fn build_command(&self, recipes: &[RecipeId]) -> ToolCommand {
        self.command()
            .arg("build")
            .args(recipes.iter().map(RecipeId::as_str))
    }
}

#[async_trait]
impl PathResolver for Chariot<'_> {
    async fn resolve(&self, recipe: &RecipeId) -> AloeResult<PathBuf> {
        let cmd = self.path_command(recipe);
        let (outcome, stdout) = self.runner.capture(&cmd).await?;
        outcome.check(&cmd)?;

        // Build chatter may precede the path; the path is the last line.
        let path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| AloeError::RecipePathEmpty(recipe.to_string()))?;

        debug!("Resolved {} to {}", recipe, path);
        Ok(PathBuf::from(path))
    }

    async fn ensure_built(&self, recipes: &[RecipeId], fail_on_error: bool) -> AloeResult<()> {
        if recipes.is_empty() {
            return Ok(());
        }

        info!(
            "Building {}",
            recipes
                .iter()
                .map(RecipeId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let cmd = self.build_command(recipes);
        let outcome = self.runner.run(&cmd).await?;
        if fail_on_error {
            outcome.check(&cmd)
        } else {
            if !outcome.success() {
                warn!("{} exited with {:?}, continuing", cmd, outcome);
            }
            Ok(())
        }
    }
}
