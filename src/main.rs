use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use college_pick::config::{self, Config, ReloadPolicy};
use college_pick::offerings::load_offerings;
use college_pick::output;
use college_pick::scoring::{recommend, Preference, DEFAULT_CATEGORY};
use college_pick::server::{self, TableSource};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_SERVER: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_PREFERENCE: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Filter on JEE Advanced (IIT) offerings instead of JEE Mains
    #[arg(long)]
    iit: bool,

    /// JEE Advanced rank (required with --iit)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    advanced_rank: Option<u64>,

    /// JEE Mains rank (required without --iit)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    mains_rank: Option<u64>,

    /// Maximum fee (unbounded if omitted)
    #[arg(long)]
    max_fee: Option<f64>,

    /// Minimum average package
    #[arg(long, default_value_t = 0.0)]
    min_salary: f64,

    /// Seat category, matched exactly
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    category: String,

    /// Offerings CSV (defaults to data.path from config)
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the top matches for a preference
    Recommend(RecommendArgs),
    /// Serve POST /api/recommend over HTTP
    Serve {
        /// Address to bind (defaults to server.bind from config)
        #[arg(long)]
        bind: Option<String>,

        /// Offerings CSV (defaults to data.path from config)
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "college-pick")]
#[command(about = "Engineering college recommendations from JEE rank, budget and category", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/college-pick/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_config_or_exit(path: Option<PathBuf>) -> Config {
    let config = match config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    config
}

fn build_preference(args: &RecommendArgs) -> Result<Preference, String> {
    let (advanced, mains) = match (args.iit, args.advanced_rank, args.mains_rank) {
        (true, None, _) => return Err("--advanced-rank is required with --iit".to_string()),
        (false, _, None) => return Err("--mains-rank is required without --iit".to_string()),
        (_, a, m) => (a, m),
    };

    if let Some(max_fee) = args.max_fee {
        if !max_fee.is_finite() || max_fee < 0.0 {
            return Err("--max-fee must be a non-negative number".to_string());
        }
    }
    if !args.min_salary.is_finite() || args.min_salary < 0.0 {
        return Err("--min-salary must be a non-negative number".to_string());
    }

    // The unused track's rank never reaches the filter
    let mut pref = Preference::new(
        args.iit,
        advanced.unwrap_or(u64::MAX),
        mains.unwrap_or(u64::MAX),
    );
    if let Some(max_fee) = args.max_fee {
        pref.max_fee = max_fee;
    }
    pref.min_salary = args.min_salary;
    pref.category = args.category.clone();
    Ok(pref)
}

fn run_recommend(args: RecommendArgs, config: &Config, verbose: bool) {
    let start_time = Instant::now();

    let pref = match build_preference(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid preference: {}", e);
            std::process::exit(EXIT_PREFERENCE);
        }
    };

    let data_path = args.data.unwrap_or_else(|| config.data.path.clone());
    let loaded = match load_offerings(&data_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if verbose {
        let report = &loaded.report;
        eprintln!(
            "Loaded {} offerings from {} ({} skipped)",
            report.rows_loaded,
            data_path.display(),
            report.skipped()
        );
    }

    let result = recommend(loaded.table.rows(), &pref);

    match args.format {
        OutputFormat::Table => {
            let use_colors = output::should_use_colors();
            if verbose && !result.matches.is_empty() {
                for m in &result.matches {
                    println!("{}", output::format_recommendation_detail(m, use_colors));
                    println!();
                }
            } else {
                println!("{}", output::format_scored_table(&result.matches, use_colors));
            }
        }
        OutputFormat::Tsv => {
            let tsv = output::format_tsv(&result.matches);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        OutputFormat::Json => {
            match serde_json::to_string_pretty(&output::to_response(&result.matches)) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize recommendations: {}", e);
                    std::process::exit(EXIT_DATA);
                }
            }
        }
    }

    if verbose {
        let diag = &result.diagnostics;
        eprintln!();
        eprintln!(
            "{} of {} offerings passed filters, {} shown in {:?}",
            diag.passed_filter,
            diag.considered,
            result.matches.len(),
            start_time.elapsed()
        );
        if diag.scoring_failures > 0 {
            eprintln!("{} offerings could not be scored", diag.scoring_failures);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Init { force } => match config::write_default_config(config_path, force) {
            Ok(path) => println!("Wrote default config to {}", path.display()),
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Recommend(args) => {
            let config = load_config_or_exit(config_path);
            run_recommend(args, &config, cli.verbose);
        }
        Commands::Serve { bind, data } => {
            let mut config = load_config_or_exit(config_path);
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let data_path = data.unwrap_or_else(|| config.data.path.clone());

            let policy = match ReloadPolicy::parse(&config.data.reload) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Config error: data.reload: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let source = match TableSource::load(&data_path, policy) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Data error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };

            if let Err(e) = server::run_server(&config.server, source).await {
                eprintln!("Server error: {}", e);
                std::process::exit(EXIT_SERVER);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
