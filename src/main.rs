//! CLI entry point for Flow-LISA and Coulter equity analyses

use clap::Parser;
use flowlisa::io::cli::{Cli, Runner};

fn main() -> flowlisa::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let mut runner = Runner::new(cli);
    runner.process()
}
