use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynthesisInput {
    pub text: String,
}

impl SynthesisInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
