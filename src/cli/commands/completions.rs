use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io;

const BIN_NAME: &str = "pfa-access";

fn clap_shell(shell: &Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    }
}

fn install_hint(shell: &Shell) -> &'static str {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc:\n#   eval \"$(pfa-access completions bash)\"",
        Shell::Zsh => "# Add to ~/.zshrc:\n#   eval \"$(pfa-access completions zsh)\"",
        Shell::Fish => {
            "# Save to:\n#   pfa-access completions fish > ~/.config/fish/completions/pfa-access.fish"
        }
        Shell::PowerShell => {
            "# Add to your profile:\n#   pfa-access completions powershell | Out-String | Invoke-Expression"
        }
        Shell::Elvish => "# Add to rc.elv:\n#   eval (pfa-access completions elvish | slurp)",
    }
}

pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    generate(clap_shell(&shell), &mut cmd, BIN_NAME, &mut io::stdout());
    eprintln!("\n{}", install_hint(&shell));
}
