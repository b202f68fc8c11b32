//! tinydata - curate downloaded image datasets
//!
//! Scores each image against the topic it was filed under and removes
//! the ones that do not match.

use anyhow::Result;
use clap::Parser;

use tinydata::cli::{Cli, Command};
use tinydata::{commands, runtime, ui};

fn main() {
	if let Err(e) = run() {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);
	runtime::set_provider(cli.provider);

	match cli.command {
		Command::Filter(args) => {
			ui::print_logo();
			commands::filter::run(&args)
		}
	}
}
