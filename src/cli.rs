//! CLI interface for LangHD
//!
//! Trains one profile per file under the training directory, encodes every
//! file under the testing directory, and prints the predicted language for
//! each test file.

use crate::classifier::Verdict;
use crate::config::Config;
use crate::encoder::TieBreak;
use crate::session::Session;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "langhd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Language identification with binary hyperdimensional computing")]
#[command(
    long_about = "LangHD - language identification with binary hypervectors\n\n\
    Every character gets a random 0/1 hypervector. Each n-gram of a document is\n\
    encoded by rotating its characters' vectors by position and XOR-ing them,\n\
    and all n-grams are majority-bundled into one document vector. A test file\n\
    is labelled with the training file whose vector is most similar.\n\n\
    Generated character vectors and trained profiles are cached on disk so a\n\
    later run compares against the same basis.\n\n\
    Examples:\n\
      langhd --train data/train --test data/test\n\
      langhd --ngram 4 --dim 8192 --no-cache --seed 42 -v\n\
      langhd --config langhd.json --ranking"
)]
pub struct Cli {
    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Training corpus directory, one language per file [default: data/train]
    #[arg(long, value_name = "DIR")]
    pub train: Option<PathBuf>,

    /// Directory of documents to classify [default: data/test]
    #[arg(long, value_name = "DIR")]
    pub test: Option<PathBuf>,

    /// Consecutive letters per n-gram [default: 3]
    #[arg(short, long, value_name = "N")]
    pub ngram: Option<usize>,

    /// Hypervector dimensionality [default: 10000]
    #[arg(short, long, value_name = "D")]
    pub dim: Option<usize>,

    /// Do not read or write the vector cache
    #[arg(long)]
    pub no_cache: bool,

    /// Vector cache directory [default: cache]
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seed the random generator for a reproducible run
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// How to bundle an even number of n-grams [default: random-vector]
    #[arg(long, value_enum, value_name = "POLICY")]
    pub tie_break: Option<TieBreak>,

    /// Print every language's similarity for each test file
    #[arg(long)]
    pub ranking: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Config file (or defaults) overridden by explicit flags.
    pub fn to_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(train) = &self.train {
            config.train = train.clone();
        }
        if let Some(test) = &self.test {
            config.test = test.clone();
        }
        if let Some(ngram) = self.ngram {
            config.ngram = ngram;
        }
        if let Some(dim) = self.dim {
            config.dim = dim;
        }
        if self.no_cache {
            config.cache = false;
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(tie_break) = self.tie_break {
            config.tie_break = tie_break;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Install the `tracing` subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One console report line.
///
/// # Examples
///
/// ```
/// use langhd::classifier::{Prediction, Verdict};
/// use langhd::cli::report_line;
///
/// let v = Verdict {
///     sample: "sample.txt".into(),
///     prediction: Some(Prediction { label: "english.txt".into(), similarity: 0.9 }),
/// };
/// assert_eq!(report_line(&v), "sample.txt: language is english.txt");
/// ```
pub fn report_line(verdict: &Verdict) -> String {
    match &verdict.prediction {
        Some(p) => format!("{}: language is {}", verdict.sample, p.label),
        None => format!("{}: could not find match language", verdict.sample),
    }
}

/// Run a full train/test/classify pass for parsed arguments.
pub fn execute(cli: &Cli) -> anyhow::Result<Vec<Verdict>> {
    let config = cli.to_config()?;
    let started = Instant::now();

    println!("\nEncoding symbols ...");
    let mut session = Session::new(config).context("building symbol basis")?;

    println!("Encoding training data ...");
    let train = session.config().train.clone();
    session
        .encode_training_dir(&train)
        .with_context(|| format!("encoding training data in {}", train.display()))?;

    println!("Encoding testing data ...");
    let test = session.config().test.clone();
    session
        .encode_testing_dir(&test)
        .with_context(|| format!("encoding testing data in {}", test.display()))?;

    println!("\nFinished in {:.3} seconds", started.elapsed().as_secs_f64());

    println!("\nTesting");
    let verdicts = session.classify_all();
    for verdict in &verdicts {
        println!("{}", report_line(verdict));
        if cli.ranking {
            if let Some(sample) = session.samples().get(&verdict.sample) {
                for p in session.classifier().rank(sample) {
                    println!("  {:<24} {:.4}", p.label, p.similarity);
                }
            }
        }
    }
    Ok(verdicts)
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(&cli)?;
    Ok(())
}
