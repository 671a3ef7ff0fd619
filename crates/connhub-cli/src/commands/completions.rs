//! Shell completions generation.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use super::{Cli, ShellType};

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Self::Bash,
            ShellType::Zsh => Self::Zsh,
            ShellType::Fish => Self::Fish,
            ShellType::PowerShell => Self::PowerShell,
            ShellType::Elvish => Self::Elvish,
        }
    }
}

/// Print completions for `shell` to stdout.
pub fn run(shell: ShellType) {
    let mut cmd = Cli::command();
    generate(Shell::from(shell), &mut cmd, "connhub", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_mention_subcommands() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        generate(Shell::Bash, &mut cmd, "connhub", &mut buf);
        let script = String::from_utf8(buf).unwrap();

        assert!(script.contains("serve"));
        assert!(script.contains("restore"));
    }
}
