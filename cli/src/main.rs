// Copyright 2026 The gitlit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Binary entry point: argument parsing, logging setup, and mapping a
//! command's `Result` to an exit code (0 success, 1 anything else).

mod author;
mod command_error;
mod commands;
mod config;
mod repo;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::ui::Ui;

#[derive(Parser, Debug)]
#[command(name = "gitlit", about = "A minimal, Git-like local version-control tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ui = Ui::for_terminal();

    let exit_code = match cli.command.run(&mut ui) {
        Ok(()) => 0,
        Err(err) => {
            ui.println_stderr(&format!("error: {err}"));
            err.exit_code()
        }
    };
    std::process::exit(exit_code);
}
