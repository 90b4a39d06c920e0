use std::process::Command;

use toolbelt_provider_api::{Actionable, ProviderError};
use tracing::debug;

/// Action that runs an external program declared by a provider definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAction {
    program: String,
    args: Vec<String>,
}

impl CommandAction {
    /// Build an action from an argv list; `None` when the list is empty.
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Actionable for CommandAction {
    fn execute(&self) -> Result<(), ProviderError> {
        debug!(program = %self.program, args = ?self.args, "running provider command");
        let status = Command::new(&self.program).args(&self.args).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(ProviderError::CommandStatus {
                program: self.program.clone(),
                status,
            })
        }
    }
}
