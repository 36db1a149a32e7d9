//! Command line shell around the paperkey engine. Reads and writes files or stdio,
//! everything else is left to the library.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{debug, error, LevelFilter};

use paperkey::errors::Result;
use paperkey::options::DEFAULT_OUTPUT_WIDTH;
use paperkey::{DataType, ExtractOptionsBuilder, RestoreOptionsBuilder};

#[derive(Debug, Parser)]
#[command(name = "paperkey", version)]
#[command(about = "Extract the secret parts of an OpenPGP key for printing, and restore them")]
struct Cli {
    /// Binary secret keyring to extract from, stdin if not given
    #[arg(long, value_name = "FILE", conflicts_with = "pubring")]
    secret_key: Option<PathBuf>,

    /// Binary public keyring to restore the secrets into
    #[arg(long, value_name = "FILE")]
    pubring: Option<PathBuf>,

    /// Extracted secrets to restore, stdin if not given
    #[arg(long, value_name = "FILE", requires = "pubring")]
    secrets: Option<PathBuf>,

    /// Where to write the result, stdout if not given
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Format of the extracted secrets
    #[arg(long, value_enum, default_value = "base16")]
    output_type: DataType,

    /// Format of the secrets to restore
    #[arg(long, value_enum, default_value = "auto")]
    input_type: DataType,

    /// Characters per line of base16 output
    #[arg(long, default_value_t = DEFAULT_OUTPUT_WIDTH)]
    output_width: usize,

    /// Restore even when checksums do not match
    #[arg(long)]
    ignore_crc_error: bool,

    /// Log more, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let out = match cli.pubring {
        Some(ref pubring) => {
            let options = RestoreOptionsBuilder::default()
                .input_type(cli.input_type)
                .ignore_checksum_errors(cli.ignore_crc_error)
                .build()?;
            let public_keyring = fs::read(pubring)?;
            let secrets = read_input(cli.secrets.as_deref())?;
            debug!(
                "restoring {} octets of secrets into {}",
                secrets.len(),
                pubring.display()
            );

            paperkey::restore_from_blob(&public_keyring, &secrets, &options)?
        }
        None => {
            let options = ExtractOptionsBuilder::default()
                .output_type(cli.output_type)
                .output_width(cli.output_width)
                .created_at(chrono::Utc::now())
                .build()?;
            let secret_keyring = read_input(cli.secret_key.as_deref())?;

            paperkey::extract_to_blob(&secret_keyring, &options)?
        }
    };

    write_output(cli.output.as_deref(), &out)?;

    Ok(())
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, data),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()
        }
    }
}
