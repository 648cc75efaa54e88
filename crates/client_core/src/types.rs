use base64::{
    alphabet,
    engine::{general_purpose::GeneralPurpose, DecodePaddingMode, GeneralPurposeConfig},
    Engine as _,
};
use shared::domain::RESULT_DOWNLOAD_FILENAME;
use thiserror::Error;

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum ResultImageError {
    #[error("result payload is not a data uri")]
    NotDataUri,
    #[error("result payload is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 in result payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Encoded swap result as returned by the processing service (a data URI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultImage {
    data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ResultImage {
    pub fn new(data_uri: impl Into<String>) -> Self {
        Self {
            data_uri: data_uri.into(),
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn download_filename(&self) -> &'static str {
        RESULT_DOWNLOAD_FILENAME
    }

    pub fn decode(&self) -> Result<DecodedImage, ResultImageError> {
        let rest = self
            .data_uri
            .strip_prefix("data:")
            .ok_or(ResultImageError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ResultImageError::NotDataUri)?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or(ResultImageError::NotBase64)?;
        let bytes = LENIENT_BASE64.decode(payload.trim())?;
        Ok(DecodedImage {
            media_type: media_type.to_string(),
            bytes,
        })
    }
}
