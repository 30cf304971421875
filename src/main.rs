use clap::{Parser, Subcommand};
use grammar_solver::{Generator, GeneratorConfig, Grammar};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Random sentence generator for BNF-style grammars
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file
    #[arg(help = "Path to the grammar file")]
    grammar_file: PathBuf,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symbols the grammar defines
    Symbols,
    /// Generate random sentences from a symbol
    Generate {
        /// The symbol to start from
        #[arg(help = "Starting non-terminal symbol")]
        symbol: String,

        /// Number of sentences to generate
        #[arg(short = 'n', long, default_value_t = 1, allow_negative_numbers = true)]
        count: i64,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Fail derivations nested deeper than this
        #[arg(long, value_name = "DEPTH")]
        max_depth: Option<usize>,

        /// JSON generator configuration; flags take precedence
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let grammar = Grammar::from_file(&cli.grammar_file)?;
    debug!(
        path = %cli.grammar_file.display(),
        symbols = grammar.len(),
        "loaded grammar"
    );

    match cli.command {
        Commands::Symbols => println!("{}", grammar),
        Commands::Generate {
            symbol,
            count,
            seed,
            max_depth,
            config,
        } => {
            let mut config = match config {
                Some(path) => GeneratorConfig::from_json_file(path)?,
                None => GeneratorConfig::default(),
            };
            if seed.is_some() {
                config.seed = seed;
            }
            if max_depth.is_some() {
                config.max_depth = max_depth;
            }

            let mut generator = Generator::from_config(&grammar, &config);
            for (i, sentence) in generator.generate(&symbol, count)?.iter().enumerate() {
                println!("{}. {}", i + 1, sentence);
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
