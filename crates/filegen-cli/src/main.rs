// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::{ArgAction, Parser};
use filegen::{format_size, prompt::parse_size_kib, FileSize, FillMethod, Plan, Prompt, PromptError, Report, Request};
use log::{debug, LevelFilter};

/// Create a file of a given size without writing its contents
#[derive(Debug, Parser)]
#[command(name = "filegen", version, about)]
struct Cli {
    /// File to create or truncate, asked for when omitted
    #[arg(conflicts_with = "config")]
    file: Option<PathBuf>,

    /// Size in KB (1 KB = 1024 bytes), asked for when omitted
    #[arg(value_name = "SIZE_KB", value_parser = parse_size_kib)]
    size: Option<FileSize>,

    /// Generate every file listed in a KDL job file
    #[arg(short, long, value_name = "JOBS")]
    config: Option<PathBuf>,

    /// Write every byte instead of leaving the file sparse
    #[arg(long)]
    zero: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    fn fill_method(&self) -> FillMethod {
        if self.zero {
            FillMethod::Zeroed
        } else {
            FillMethod::Sparse
        }
    }
}

/// Build the request from arguments, prompting for whatever is missing
fn interactive_request<R, W>(cli: &Cli, prompt: &mut Prompt<R, W>) -> Result<Request, PromptError>
where
    R: BufRead,
    W: Write,
{
    if cli.file.is_none() {
        prompt.say("File size generator")?;
    }

    let path = match &cli.file {
        Some(file) => file.clone(),
        None => prompt.filename()?,
    };
    let size = match cli.size {
        Some(size) => size,
        None => prompt.size()?,
    };

    Ok(Request::new(path, size).with_method(cli.fill_method()))
}

/// Success line for a generated file, with the on-disk allocation when verbose
fn describe(report: &Report, verbose: bool) -> String {
    let mut line = format!(
        "File '{}' successfully created with size {}.",
        report.path.display(),
        report.size
    );
    if let (true, Some(allocated)) = (verbose, report.allocated) {
        line.push_str(&format!(" ({} allocated on disk)", format_size(allocated)));
    }
    line
}

fn run<R, W>(cli: &Cli, prompt: &mut Prompt<R, W>) -> Result<(), PromptError>
where
    R: BufRead,
    W: Write,
{
    let requests = match &cli.config {
        Some(config) => match Plan::from_path(config) {
            Ok(plan) => plan.requests,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                return Ok(());
            }
        },
        None => vec![interactive_request(cli, prompt)?],
    };

    for request in &requests {
        match filegen::generate(request) {
            Ok(report) => prompt.say(&describe(&report, cli.verbose > 0))?,
            Err(e) => {
                debug!("Failed to create {:?}: {:?}", request.path, e);
                prompt.say(&format!(
                    "An error occurred while creating '{}': {e}",
                    request.path.display()
                ))?
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    pretty_env_logger::formatted_timed_builder()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut prompt = Prompt::new(io::stdin().lock(), io::stdout());
    if let Err(e) = run(&cli, &mut prompt) {
        eprintln!("{e}");
    }
}
