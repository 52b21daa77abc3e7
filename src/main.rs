mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use classloc::diagnostics;
use classloc::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "classloc", about = "Map JVM binary class names to source locations and back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Directory containing `.classloc.toml`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the binary class name at a line of a `file:` URI
    NameAt {
        /// `file:` URI, or any other text to pass through unchanged
        file_or_name: String,
        /// One-based line number
        #[arg(allow_negative_numbers = true)]
        line: i64,
    },
    /// Print the source line or library member for a binary class name
    LocationOf {
        /// Binary class name, e.g. `org.example.Outer$1Local`
        binary_name: String,
        /// One-based line number
        #[arg(allow_negative_numbers = true)]
        line: i64,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// List every project and library declaring a binary name's outer class
    Types {
        /// Binary class name
        binary_name: String,
    },
    /// List the types declared in a Java source file
    Symbols {
        /// Path to the source file
        file: PathBuf,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::NameAt { file_or_name, line } => commands::name_at(&cli.root, file_or_name, *line),
        Commands::LocationOf { binary_name, line, json } => {
            commands::location_of(&cli.root, binary_name, *line, *json)
        },
        Commands::Types { binary_name } => commands::types(&cli.root, binary_name),
        Commands::Symbols { file, json } => commands::symbols(&cli.root, file, *json),
    };

    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            exit_code_for(&e)
        },
    };
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| return EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Exit code priority: not found (1), malformed input (2), anything else (3).
fn exit_code_for(e: &Error) -> ExitCode {
    if e.is_not_found() {
        return ExitCode::from(1);
    }
    if matches!(e, Error::MalformedInput { .. }) {
        return ExitCode::from(2);
    }
    return ExitCode::from(3);
}
