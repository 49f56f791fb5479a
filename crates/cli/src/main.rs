mod attendees;
mod context;
mod csv_cmd;
mod no_shows;
mod registrants;
mod replay;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use leadwire_api_client::JamPlatform;

#[derive(Parser)]
#[command(name = "leadwire", about = "Webinar attendance to CRM lead pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch Zoom participants and forward high-engagement leads
    Attendees,

    /// Fetch Zoom absentees and forward them as no-shows
    NoShows,

    /// Fetch WebinarJam or EverWebinar registrants and forward every lead
    Registrants {
        /// Which platform's registrants API to call
        #[arg(long, value_enum, default_value_t = PlatformArg::Webinarjam)]
        platform: PlatformArg,
    },

    /// Fetch EverWebinar replay watchers and forward every lead
    Replay,

    /// Read a CSV attendance export and forward every lead
    ImportCsv {
        /// Path to the CSV file
        file: PathBuf,
    },

    /// Rewrite a CSV with yes/no columns normalized to 1/0
    NormalizeCsv {
        /// Input CSV
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Webinarjam,
    Everwebinar,
}

impl From<PlatformArg> for JamPlatform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Webinarjam => JamPlatform::WebinarJam,
            PlatformArg::Everwebinar => JamPlatform::EverWebinar,
        }
    }
}

#[tokio::main]
async fn main() {
    // Hosted deployments set RENDER and inject real environment variables;
    // everywhere else a .env file may supply them.
    if std::env::var_os("RENDER").is_none() {
        let _ = dotenvy::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Attendees => attendees::run().await,
        Commands::NoShows => no_shows::run().await,
        Commands::Registrants { platform } => registrants::run(platform.into()).await,
        Commands::Replay => replay::run().await,
        Commands::ImportCsv { file } => csv_cmd::run_import(&file).await,
        Commands::NormalizeCsv { input, output } => csv_cmd::run_normalize(&input, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
