use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::info;
use markov_gen_core::model::generation_input::DEFAULT_LENGTH;
use markov_gen_core::{GenerationInput, Predictor};

/// Trains a word-level Markov chain on a text file and continues prompts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Training corpus (plain text)
    #[arg(short, long, value_name = "PATH", default_value = "text.txt")]
    corpus: PathBuf,

    /// Number of generated tokens, prompt seed included
    #[arg(short, long, value_name = "TOKENS", default_value_t = DEFAULT_LENGTH)]
    length: usize,

    /// Seed the random generator for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generate once for this prompt instead of reading prompts from stdin
    #[arg(short, long)]
    prompt: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-3 => "off",
            -2 => "error",
            -1 => "warn",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    fn input(&self, prompt: &str) -> GenerationInput {
        GenerationInput { prompt: prompt.to_owned(), length: self.length, seed: self.seed }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level())).init();

    // Train once, then answer every prompt with the same model
    let mut predictor = Predictor::from_corpus_file(&cli.corpus)
        .with_context(|| format!("failed to train on {}", cli.corpus.display()))?;
    let summary = predictor.summary();
    info!("model ready: {} words, {} records", summary.vocabulary_size, summary.record_count);

    if let Some(prompt) = &cli.prompt {
        println!("{}", predictor.generate(&cli.input(prompt))?);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, ">")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim_end_matches(['\r', '\n']);
        writeln!(stdout, "{}", predictor.generate(&cli.input(prompt))?)?;
    }

    Ok(())
}
