//! The JSON record printed on success.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::crypto::cipher::SealedNonce;

/// Output record for a successful encryption.
///
/// Field names and the tab-indented rendering are part of the tool's
/// contract; downstream import tooling consumes this output verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedNonceRecord {
    /// Base64 ciphertext (GCM: including the trailing auth tag).
    #[serde(rename = "encryptedNonce")]
    pub encrypted_nonce: String,

    /// Base64 IV the ciphertext was produced under.
    pub iv: String,
}

impl From<&SealedNonce> for EncryptedNonceRecord {
    fn from(sealed: &SealedNonce) -> Self {
        Self {
            encrypted_nonce: STANDARD.encode(&sealed.ciphertext),
            iv: STANDARD.encode(&sealed.iv),
        }
    }
}

impl EncryptedNonceRecord {
    /// Render the record as pretty JSON indented with one tab per level.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(serde::ser::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_encodes_sealed_bytes_as_base64() {
        let sealed = SealedNonce {
            ciphertext: vec![0, 1, 2, 3],
            iv: vec![0xFF; 12],
        };
        let record = EncryptedNonceRecord::from(&sealed);
        assert_eq!(record.encrypted_nonce, "AAECAw==");
        assert_eq!(record.iv, "////////////////");
    }

    #[test]
    fn to_json_uses_tab_indentation_and_stable_field_order() {
        let record = EncryptedNonceRecord {
            encrypted_nonce: "Y2lwaGVy".into(),
            iv: "aXY=".into(),
        };
        let json = record.to_json().unwrap();
        assert_eq!(
            json,
            "{\n\t\"encryptedNonce\": \"Y2lwaGVy\",\n\t\"iv\": \"aXY=\"\n}"
        );
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = EncryptedNonceRecord {
            encrypted_nonce: "Y2lwaGVy".into(),
            iv: "aXY=".into(),
        };
        let json = record.to_json().unwrap();
        let decoded: EncryptedNonceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }
}
