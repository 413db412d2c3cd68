use std::time::Duration;

use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;

use crate::domain::SubscriberEmail;

/// A forwarding attempt that never reached the provider, or was refused by it
#[derive(thiserror::Error, Debug)]
pub enum ForwardError {
    #[error("EMAIL_TOKEN is not configured")]
    MissingToken,
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Client for the provider's subscriber API. Holds the one `reqwest::Client`
/// for the whole app; establishing a HTTP connection is expensive, so the
/// client is built once at startup and shared via App data.
pub struct SubscriptionClient {
    http_client: Client,
    base_url: String,
    authorization_token: Option<Secret<String>>,
}

impl SubscriptionClient {
    pub fn new(
        base_url: String,
        authorization_token: Option<Secret<String>>,
        timeout: Duration,
    ) -> Self {
        // without an explicit timeout, the hosting platform's request timeout
        // would govern worst-case latency
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
            authorization_token,
        }
    }

    /// `POST {base_url}/v1/subscribers` with `Authorization: Token <secret>`
    /// and body `{"email": ...}`.
    ///
    /// The token is checked before any request is built, so an unconfigured
    /// deployment never produces outbound traffic. The call is attempted
    /// exactly once; redelivery on transient failure is the hosting platform's
    /// business, not ours.
    pub async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ForwardError> {
        let token = self
            .authorization_token
            .as_ref()
            .ok_or(ForwardError::MissingToken)?;

        let url = format!("{}/v1/subscribers", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Token {}", token.expose_secret()))
            .json(&SubscribeBody {
                email: email.as_ref(),
            })
            .send()
            .await?
            // non-2xx from the provider is a failure, same as not reaching it
            .error_for_status()?;

        // the provider echoes the subscriber record; keep it in the operator
        // log, never in the caller-visible response
        let body = response.text().await?;
        tracing::info!(provider_response = %body, "forwarded submission to the provider");

        Ok(())
    }
}

#[derive(serde::Serialize)]
struct SubscribeBody<'a> {
    email: &'a str,
}
