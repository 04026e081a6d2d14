use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct SynthesizeResponse {
    pub audioContent: String,
}

impl SynthesizeResponse {
    /// Decode the base64 transport encoding into raw audio bytes.
    pub fn decode_audio(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.audioContent)?)
    }
}
