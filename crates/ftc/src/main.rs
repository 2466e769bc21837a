// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use fortran_to_c::options::{base_name, RUNTIME_ROOT_ENV};
use fortran_to_c::{SourceUnit, TargetUnit, TranslationOutput, TranslationPipeline, TranslatorOptions};
use log::{debug, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Translates parsed Fortran units into C units and forward-declaration headers",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Source trees of the units to translate, one JSON-encoded unit per file
    #[clap(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving the translated units and headers
    #[clap(long = "output-dir", short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Translator options in TOML
    #[clap(long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// Runtime directory holding the template unit
    #[clap(long = "runtime-root", env = RUNTIME_ROOT_ENV)]
    pub runtime_root: Option<PathBuf>,

    /// Display detailed translation progress
    #[clap(long, short = 'v')]
    pub verbose: bool,
}

fn main() {
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Trace } else { LevelFilter::Info };
    if TermLogger::init(level, Config::default(), TerminalMode::Stderr).is_err() {
        eprintln!("logger already initialized");
    }
    debug!("ftc version: {}", env!("CARGO_PKG_VERSION"));

    match execute(args) {
        Ok(()) => (),
        Err(err) => {
            let err = format!("{:?}", err);
            println!("{}", err.bold().red());
            std::process::exit(1);
        }
    }
}

fn execute(args: Args) -> anyhow::Result<()> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            TranslatorOptions::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TranslatorOptions::default(),
    };
    if let Some(root) = args.runtime_root {
        options = options.with_runtime_root(root);
    }

    let sources = args
        .inputs
        .iter()
        .map(|path| read_source(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let output = TranslationPipeline::new(&options).run(&sources);

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    for translated in &output.units {
        write_unit(&args.output_dir, &translated.unit)?;
        write_unit(&args.output_dir, &translated.header)?;
    }

    report(&output);
    if output.error_count() > 0 {
        bail!("{} of {} units failed to translate", output.error_count(), sources.len());
    }
    Ok(())
}

fn read_source(path: &Path) -> anyhow::Result<SourceUnit> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("decoding source tree {}", path.display()))
}

/// Units are written as `<file name>.json` for the external printer
fn write_unit(dir: &Path, unit: &TargetUnit) -> anyhow::Result<()> {
    let path = dir.join(format!("{}.json", base_name(&unit.file_name)));
    let json = serde_json::to_string_pretty(unit)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

fn report(output: &TranslationOutput) {
    for translated in &output.units {
        println!(
            "{} {} (+ {})",
            "translated".green().bold(),
            translated.unit.file_name,
            translated.header.file_name
        );
    }
    for failure in &output.failures {
        println!("{} {}: {}", "failed".red().bold(), failure.file_name, failure.error);
    }
}
