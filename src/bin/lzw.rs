use clap::{Args, Parser, Subcommand};
use log::info;
use lzw_trie::compression::{compress_dir, decompress_dir, Compression, Lzw, LzwConfig, OnFull};
use lzw_trie::compression::{DEFAULT_CODE_WIDTH, MAX_CODE_WIDTH, MIN_CODE_WIDTH};
use lzw_trie::Result;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lzw")]
#[command(about = "Compress files or directories with trie-backed LZW")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file, or every file under a directory
    Compress {
        #[command(flatten)]
        paths: Paths,

        /// Maximum code width in bits
        #[arg(long, default_value_t = DEFAULT_CODE_WIDTH,
              value_parser = clap::value_parser!(u8).range(MIN_CODE_WIDTH as i64..=MAX_CODE_WIDTH as i64))]
        width: u8,

        /// Restart the dictionary when it fills up instead of freezing it
        #[arg(long)]
        reset: bool,
    },

    /// Restore a file, or every .lzw file under a directory
    Decompress {
        #[command(flatten)]
        paths: Paths,
    },
}

#[derive(Args)]
struct Paths {
    /// File or directory to read
    input: PathBuf,

    /// File or directory to write
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lzw_trie=info,lzw=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lzw: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Compress {
            paths,
            width,
            reset,
        } => {
            let on_full = if reset { OnFull::Reset } else { OnFull::Freeze };
            let lzw = Lzw::new(LzwConfig::new(width, on_full)?);
            if paths.input.is_dir() {
                let written = compress_dir(&lzw, &paths.input, &paths.output)?;
                info!(
                    "compressed {} files into {}",
                    written.len(),
                    paths.output.display()
                );
            } else {
                let data = fs::read(&paths.input)?;
                let packed = lzw.compress(&data)?;
                fs::write(&paths.output, &packed)?;
                info!("{} -> {} bytes", data.len(), packed.len());
            }
        }
        Commands::Decompress { paths } => {
            // The container header carries the configuration.
            let lzw = Lzw::default();
            if paths.input.is_dir() {
                let written = decompress_dir(&lzw, &paths.input, &paths.output)?;
                info!(
                    "restored {} files into {}",
                    written.len(),
                    paths.output.display()
                );
            } else {
                let packed = fs::read(&paths.input)?;
                let data = lzw.decompress(&packed)?;
                fs::write(&paths.output, &data)?;
                info!("{} -> {} bytes", packed.len(), data.len());
            }
        }
    }

    Ok(())
}
