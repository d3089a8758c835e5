mod args;
mod display;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{Level, info};
use triage_nlu::Pipeline;

use crate::args::{Args, OutputFormat};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    info!("triage v{}", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let input = args.input_text();
    if input.is_none() && !args.interactive {
        anyhow::bail!("Please provide symptoms as command line arguments");
    }

    let pipeline = Pipeline::load(&args.artifact_paths(), args.pipeline_options())
        .context("Error loading model")?;

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(text) = input {
        respond(&pipeline, &text, args.format, rng.as_mut(), &mut out)?;
    }
    if args.interactive {
        run_interactive(&pipeline, io::stdin().lock(), &mut out, args.format, rng.as_mut())?;
    }
    Ok(())
}

/// Answer one description per input line until EOF or `quit`/`exit`.
fn run_interactive<R: BufRead, W: Write>(
    pipeline: &Pipeline,
    reader: R,
    out: &mut W,
    format: OutputFormat,
    rng: &mut dyn RngCore,
) -> anyhow::Result<usize> {
    let mut answered = 0;
    for line in reader.lines() {
        let line = line.context("reading stdin")?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }
        respond(pipeline, text, format, rng, out)?;
        answered += 1;
    }
    info!(answered, "interactive session finished");
    Ok(answered)
}

fn respond<W: Write>(
    pipeline: &Pipeline,
    text: &str,
    format: OutputFormat,
    rng: &mut dyn RngCore,
    out: &mut W,
) -> anyhow::Result<()> {
    let result = pipeline.process_with_rng(text, rng)?;
    writeln!(out, "{}", display::render(&result, format)?)?;
    out.flush()?;
    Ok(())
}
