use clap::Args;

use crate::error::Result;
use crate::input::load_certificate;
use crate::output::InputFormat;
use crate::utils::read_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file. If not specified, reads from stdin
    file: Option<String>,

    /// Input encoding. Detected as PEM or DER when omitted
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input_bytes = read_input(config.file.as_deref())?;
    let cert = load_certificate(&input_bytes, config.format)?;

    // The certificate's Display is the annotated structure tree
    println!("{cert}");

    Ok(())
}
