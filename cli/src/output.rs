#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

/// Encoding of the input certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum InputFormat {
    Ber,
    Cer,
    Der,
    Xer,
    /// PEM armored DER
    Pem,
}
