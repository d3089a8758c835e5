//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use triage_core::ArtifactPaths;
use triage_nlu::{CaseMode, DEFAULT_THRESHOLD, PipelineOptions};

/// Map a free-text symptom description to an intent and a canned response.
#[derive(Parser, Debug, Clone)]
#[command(name = "triage", version, long_about = None)]
pub struct Args {
    /// Symptom description. Words are joined with single spaces.
    pub symptoms: Vec<String>,

    /// Directory holding intents.json, words.json, classes.json, and model.json
    #[arg(long, env = "TRIAGE_ARTIFACTS", default_value = ".")]
    pub artifacts: PathBuf,

    /// Intent catalog (overrides <ARTIFACTS>/intents.json)
    #[arg(long, env = "TRIAGE_INTENTS")]
    pub intents: Option<PathBuf>,

    /// Vocabulary word list (overrides <ARTIFACTS>/words.json)
    #[arg(long, env = "TRIAGE_WORDS")]
    pub words: Option<PathBuf>,

    /// Intent label list (overrides <ARTIFACTS>/classes.json)
    #[arg(long, env = "TRIAGE_CLASSES")]
    pub classes: Option<PathBuf>,

    /// Classifier artifact, `.json` dense weights or `.onnx` (overrides <ARTIFACTS>/model.json)
    #[arg(long, env = "TRIAGE_MODEL")]
    pub model: Option<PathBuf>,

    /// Minimum probability (exclusive) for an intent to be reported
    #[arg(long, env = "TRIAGE_THRESHOLD", default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: f32,

    /// Match words case-sensitively instead of lowercasing input
    #[arg(long)]
    pub preserve_case: bool,

    /// Seed response selection for reproducible output
    #[arg(long, env = "TRIAGE_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Read one description per line from stdin until EOF or `quit`
    #[arg(short, long)]
    pub interactive: bool,

    /// Log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Indented JSON
    Pretty,
    /// Human-readable card
    Card,
}

impl Args {
    /// The symptom words joined into one input string, if any were given.
    pub fn input_text(&self) -> Option<String> {
        if self.symptoms.is_empty() {
            None
        } else {
            Some(self.symptoms.join(" "))
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.artifacts);
        ArtifactPaths {
            intents: self.intents.clone().unwrap_or(defaults.intents),
            words: self.words.clone().unwrap_or(defaults.words),
            classes: self.classes.clone().unwrap_or(defaults.classes),
            model: self.model.clone().unwrap_or(defaults.model),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            threshold: self.threshold,
            case_mode: if self.preserve_case {
                CaseMode::Preserve
            } else {
                CaseMode::Fold
            },
        }
    }
}

fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in [0, 1)"))
    }
}
