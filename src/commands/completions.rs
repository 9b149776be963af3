//! Shell completion generation

use clap::CommandFactory;
use clap_complete::Shell;

use loopmark::cli::Cli;

#[cfg(not(tarpaulin_include))]
pub fn handle(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "loopmark", &mut std::io::stdout());
}
