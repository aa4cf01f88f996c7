use clap::{Parser, Subcommand};

mod generate;
mod logger;

#[derive(Parser)]
#[command(name = "csrtool")]
#[command(about = "A tool for generating private keys and CSRs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new private key and CSR
    Generate {
        #[command(flatten)]
        config: generate::Config,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config } => generate::execute(config)?,
        Commands::Version => {
            println!("csrtool version {}", env!("CARGO_PKG_VERSION"));
            println!(
                "Build time: {}",
                option_env!("CSRTOOL_BUILD_TIME").unwrap_or("unknown")
            );
            println!(
                "Git commit: {}",
                option_env!("CSRTOOL_GIT_COMMIT").unwrap_or("unknown")
            );
        }
    }

    Ok(())
}
