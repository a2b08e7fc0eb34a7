//! `secure-import` — CLI binary entry point.
//!
//! Execution sequence:
//! 1. Parse command-line arguments.
//! 2. Initialise telemetry (stderr only).
//! 3. Encrypt the nonce under the supplied key material.
//! 4. Print the encrypted nonce and IV as indented JSON on stdout.

mod cli;
mod crypto;
mod output;
mod telemetry;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use cli::Cli;
use crypto::Algorithm;
use output::EncryptedNonceRecord;

fn run() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command-line arguments
    // -----------------------------------------------------------------------
    let args = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init()?;

    // -----------------------------------------------------------------------
    // 3. Encryption
    // -----------------------------------------------------------------------
    let algorithm: Algorithm = args.alg.parse()?;
    debug!(?algorithm, "encrypting nonce");
    let sealed = crypto::encrypt_nonce(&args.key, &args.nonce, algorithm)?;

    // -----------------------------------------------------------------------
    // 4. Output
    // -----------------------------------------------------------------------
    let record = EncryptedNonceRecord::from(&sealed);
    let json = record
        .to_json()
        .context("failed to serialise output record")?;
    println!("{json}");

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            _ = writeln!(io::stderr(), "ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
