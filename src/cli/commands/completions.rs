//! Shell completions for `rb`.

use crate::cli::{Cli, Shell};
use crate::error::Result;
use clap::CommandFactory;
use std::io::{self, Write};

const BIN_NAME: &str = "rb";

impl From<&Shell> for clap_complete::Shell {
    fn from(shell: &Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: &Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, BIN_NAME, out);
}

/// Print completions for the specified shell to stdout.
pub fn execute(shell: &Shell) -> Result<()> {
    let mut out = io::stdout().lock();
    write_completions(shell, &mut out);
    out.flush()?;
    Ok(())
}
