//! Command-line surface.

use clap::Parser;

/// Encrypt a key-import nonce under the key material being imported.
///
/// Both inputs are base64; the encrypted nonce and IV are printed as JSON
/// on stdout, ready to be passed to the import request.
#[derive(Parser, Debug)]
#[command(name = "secure-import", version)]
pub struct Cli {
    /// Key material to import into the key-management service (base64).
    #[arg(long)]
    pub key: String,

    /// Nonce issued by the key-management service (base64).
    #[arg(long)]
    pub nonce: String,

    /// Encryption algorithm: GCM or CBC.
    #[arg(long, default_value = "GCM")]
    pub alg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_flags_and_defaults_alg() {
        let cli = Cli::try_parse_from(["secure-import", "--key", "a2V5", "--nonce", "bm9uY2U="])
            .unwrap();
        assert_eq!(cli.key, "a2V5");
        assert_eq!(cli.nonce, "bm9uY2U=");
        assert_eq!(cli.alg, "GCM");
    }

    #[test]
    fn accepts_explicit_alg() {
        let cli = Cli::try_parse_from([
            "secure-import",
            "--key",
            "a2V5",
            "--nonce",
            "bm9uY2U=",
            "--alg",
            "CBC",
        ])
        .unwrap();
        assert_eq!(cli.alg, "CBC");
    }

    #[test]
    fn rejects_missing_key_or_nonce() {
        assert!(Cli::try_parse_from(["secure-import", "--nonce", "bm9uY2U="]).is_err());
        assert!(Cli::try_parse_from(["secure-import", "--key", "a2V5"]).is_err());
    }
}
