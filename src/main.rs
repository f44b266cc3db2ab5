//! RecipeBox CLI entry point.

use clap::Parser;
use recipebox::cli::commands::{self, insights, recipe};
use recipebox::cli::{Cli, Commands, OutputFormat};
use recipebox::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        recipebox::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        recipebox::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR --format json OR non-TTY stdout
    let json = cli.json
        || cli.format == OutputFormat::Json
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();

    match &cli.command {
        Commands::Version => commands::version::execute(json),

        // Recipes
        Commands::Add(args) => recipe::add(args, db, json),
        Commands::Show { id, servings } => recipe::show(id, *servings, db, json),
        Commands::List(args) => recipe::list(args, db, json),
        Commands::Update(args) => recipe::update(args, db, json),
        Commands::Delete { id } => recipe::delete(id, db, json),
        Commands::Seed { file } => commands::seed::execute(file, db, json),

        // Queries
        Commands::Share { id } => insights::share(id, db, json),
        Commands::Suggest { count } => insights::suggest(*count, db, json),
        Commands::Stats { ratings } => insights::stats(ratings, db, json),

        Commands::Whoami => commands::whoami::execute(db, json),

        // Shell completions
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
