use clap::Parser;

use fadtrack::adapter::inbound::cli::{self, command::Cli};

fn main() {
    let cli = Cli::parse();
    let code = cli::execute(&cli);
    std::process::exit(code);
}
