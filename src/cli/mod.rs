//! CLI layer: prompts, terminal output and wiring

mod backport;
mod context;
pub mod style;

pub use backport::{CommitSource, run_backport};

use anstream::{eprintln, println};
use async_trait::async_trait;
use backporter::cherry_pick::Interaction;
use backporter::error::{Error, Result};
use dialoguer::Input;
use style::{Stylize, WARN, arrow};

/// Terminal implementation of [`Interaction`]
pub struct CliInteraction;

#[async_trait]
impl Interaction for CliInteraction {
    async fn on_message(&self, message: &str) {
        println!("{} {message}", arrow());
    }

    async fn on_warning(&self, message: &str) {
        println!("{}", format!("{WARN}  {message}").warn());
    }

    async fn on_error(&self, message: &str) {
        eprintln!("{}", message.error());
    }

    async fn await_conflict_resolution(&self, attempt: u32) -> Result<()> {
        let prompt = if attempt > 1 {
            format!(
                "Conflicts remain (attempt {attempt}). Fix them, save the files and press Enter"
            )
        } else {
            "Resolve the conflicts in your editor, save the files and press Enter \
             (files will be staged and the cherry-pick continued)"
                .to_string()
        };

        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(|_| ())
            .map_err(|e| Error::Input(format!("failed to read confirmation: {e}")))
    }
}

/// Print a fatal error, with a recovery hint for failures that left the
/// repository mid-sequence
pub fn report_error(error: &Error) {
    eprintln!("{} {error}", "Error:".error());
    if matches!(
        error,
        Error::CommandFailed { .. } | Error::CommandTimeout { .. } | Error::CherryPickFailed { .. }
    ) {
        eprintln!(
            "{}",
            "The repository was left as-is. Inspect it with `git status` before retrying.".muted()
        );
    }
}
