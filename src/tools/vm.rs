//! QEMU debugging runs of the kernel image
//!
//! The guest starts paused with the gdb stub open, so the run normally ends
//! with the user pressing Ctrl-C. That is treated as a clean exit.

use crate::chariot::{parse_recipes, PathResolver, RecipeId};
use crate::config::schema::QemuConfig;
use crate::config::Config;
use crate::error::AloeResult;
use crate::process::{CommandRunner, Outcome, ToolCommand};
use crate::tools::terminal::FontControl;
use std::path::Path;
use tracing::info;

/// Fixed emulator arguments for a paused, headless, software-emulated run
pub fn qemu_args(image_dir: &Path, config: &QemuConfig) -> Vec<String> {
    let image = image_dir.join(&config.image_file);

    vec![
        "-accel".into(),
        "tcg".into(),
        "-machine".into(),
        "q35".into(),
        "-cpu".into(),
        "qemu64".into(),
        "-smp".into(),
        format!("cores={}", config.cores),
        "-m".into(),
        config.memory.clone(),
        "-M".into(),
        "smm=off".into(),
        "-d".into(),
        "int".into(),
        "-D".into(),
        config.log_file.to_string_lossy().into_owned(),
        "-debugcon".into(),
        "file:/dev/stdout".into(),
        "-S".into(),
        "-s".into(),
        "-no-reboot".into(),
        "-no-shutdown".into(),
        "-display".into(),
        "none".into(),
        "-drive".into(),
        format!("format=raw,file={}", image.display()),
        "-drive".into(),
        format!(
            "if=pflash,unit=0,format=raw,file={},readonly=on",
            config.firmware_path.display()
        ),
    ]
}

pub fn qemu_command(image_dir: &Path, config: &QemuConfig) -> ToolCommand {
    ToolCommand::new(&config.program)
        .args(qemu_args(image_dir, config))
        .interruptible()
}

/// Options of a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave the terminal font alone
    pub no_font: bool,
    /// Print the emulator command instead of running it
    pub dry_run: bool,
}

/// Build, resolve, and run the image. Returns how QEMU ended; an interrupt
/// is a successful run.
pub async fn run_vm(
    runner: &dyn CommandRunner,
    resolver: &dyn PathResolver,
    config: &Config,
    options: RunOptions,
) -> AloeResult<Option<Outcome>> {
    let qemu = &config.qemu;

    let recipes = parse_recipes(&qemu.recipes)?;
    resolver.ensure_built(&recipes, true).await?;

    let image_recipe: RecipeId = qemu.image_recipe.parse()?;
    let image_dir = resolver.resolve(&image_recipe).await?;
    let cmd = qemu_command(&image_dir, qemu);

    if options.dry_run {
        println!("{}", cmd);
        return Ok(None);
    }

    let mut font = FontControl::new(runner, &config.terminal);
    if options.no_font {
        font = font.disabled();
    }

    font.debugging().await;
    let result = runner.run(&cmd).await;
    // Restored on every path, including emulator failures.
    font.restore().await;

    let outcome = result?;
    match outcome {
        Outcome::Interrupted => {
            info!("QEMU interrupted");
            Ok(Some(outcome))
        }
        other => {
            other.check(&cmd)?;
            Ok(Some(other))
        }
    }
}
