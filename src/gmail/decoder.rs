use base64::alphabet;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use base64::Engine as _;
use thiserror::Error;

// Gmail sends URL-safe base64, sometimes with and sometimes without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug)]
#[error("invalid base64 body: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_error: bool,
}

pub fn decode_base64url(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let normalized: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    Ok(URL_SAFE_LENIENT.decode(normalized)?)
}

pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

/// Decodes a transport-encoded body. A malformed payload never fails the
/// caller: the original text is kept and the result is flagged.
pub fn decode_body(encoded: &str) -> DecodedBody {
    if encoded.is_empty() {
        return DecodedBody {
            text: String::new(),
            encoding_error: false,
        };
    }
    match decode_base64url(encoded) {
        Ok(bytes) => DecodedBody {
            text: String::from_utf8_lossy(&bytes).into_owned(),
            encoding_error: false,
        },
        Err(e) => {
            log::warn!("Failed to decode body data ({e}); keeping original text");
            DecodedBody {
                text: encoded.to_string(),
                encoding_error: true,
            }
        }
    }
}
