use crate::{
    errors::{constants::GCP_SCOPE, Result, TTSError},
    tts::gcp_tts::structs::{
        synthesize_request::SynthesizeRequest, synthesize_response::SynthesizeResponse,
    },
};
use gcp_auth::Token;
use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::debug;

/// How requests to the synthesis endpoint are authenticated.
#[derive(Clone)]
pub enum Credential {
    /// Unauthenticated. The API answers with an error status.
    None,
    /// API key sent as the `key` query parameter.
    ApiKey(String),
    /// Service account credentials exchanged for a bearer token.
    ServiceAccount {
        token: Arc<RwLock<Token>>,
        credentials_path: String,
    },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::None => write!(f, "None"),
            Credential::ApiKey(_) => write!(f, "ApiKey(<redacted>)"),
            Credential::ServiceAccount {
                credentials_path, ..
            } => f
                .debug_struct("ServiceAccount")
                .field("credentials_path", credentials_path)
                .finish(),
        }
    }
}

impl Credential {
    #[tracing::instrument]
    pub async fn service_account(credentials_path: String) -> Result<Self> {
        let authenticator = gcp_auth::from_credentials_file(credentials_path.clone()).await?;
        let token = authenticator.get_token(&[GCP_SCOPE]).await?;

        Ok(Credential::ServiceAccount {
            token: Arc::new(RwLock::new(token)),
            credentials_path,
        })
    }
}

#[derive(Clone, Debug)]
pub struct GCPTTS {
    client: reqwest::Client,
    endpoint: String,
    credential: Credential,
}

impl GCPTTS {
    pub fn new(
        credential: Credential,
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            credential,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn bearer_token(&self) -> Result<Option<String>> {
        let Credential::ServiceAccount {
            token,
            credentials_path,
        } = &self.credential
        else {
            return Ok(None);
        };

        {
            let mut token = token.write().await;
            if token.has_expired() {
                debug!("Refreshing expired GCP token");
                let authenticator =
                    gcp_auth::from_credentials_file(credentials_path.clone()).await?;
                *token = authenticator.get_token(&[GCP_SCOPE]).await?;
            }
        }

        let token = token.read().await;
        Ok(Some(token.as_str().to_string()))
    }

    /// Synthesize text to speech and return the API response.
    ///
    /// A non-success status yields [`TTSError::Status`]; a body that is not
    /// `{ "audioContent": ... }` yields [`TTSError::MalformedResponse`].
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    pub async fn synthesize(&self, request: &SynthesizeRequest) -> Result<SynthesizeResponse> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Credential::ApiKey(key) = &self.credential {
            builder = builder.query(&[("key", key)]);
        }

        if let Some(token) = self.bearer_token().await? {
            builder = builder.bearer_auth(token);
        }

        let response = builder.body(serde_json::to_string(request)?).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TTSError::status(status.as_u16(), body));
        }

        serde_json::from_str::<SynthesizeResponse>(&body)
            .map_err(|e| TTSError::malformed_response(e.to_string()))
    }
}
