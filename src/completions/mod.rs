//! Shell completion support for tagnarrow
//!
//! Static completions only: subcommands, flags and value hints generated from
//! the clap command tree.

use crate::cli::Cli;
use clap::{Command, CommandFactory};
use clap_complete::Shell;
use std::io::Write;

/// Generate a completion script for `cmd` into `buf`
pub fn generate_static<W: Write>(shell: Shell, cmd: &mut Command, buf: &mut W) {
    clap_complete::generate(shell, cmd, cmd.get_name().to_string(), buf);
}

/// Generate the tagnarrow completion script into `buf`
pub fn generate_for_cli<W: Write>(shell: Shell, buf: &mut W) {
    let mut cmd = Cli::command();
    generate_static(shell, &mut cmd, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_mentions_subcommands() {
        let mut out = Vec::new();
        generate_for_cli(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("tagnarrow"));
        assert!(script.contains("deselect"));
    }

    #[test]
    fn test_every_shell_generates() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            let mut out = Vec::new();
            generate_for_cli(shell, &mut out);
            assert!(!out.is_empty());
        }
    }
}
