use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use serde::Deserialize;

use super::error_chain_fmt;
use crate::domain::SubscriberEmail;
use crate::subscription_client::ForwardError;
use crate::subscription_client::SubscriptionClient;

/// The single recognized form; submissions from any other form are somebody
/// else's webhook
const RECOGNIZED_FORM: &str = "email-subscription";

/// Query parameter surface of the webhook. The hosting platform historically
/// posted `form-name`; both spellings are accepted.
#[derive(Deserialize)]
pub struct SubmissionQuery {
    email: Option<String>,
    #[serde(alias = "form-name")]
    form_name: Option<String>,
}

/// JSON request body, with the field values nested under `payload`
#[derive(Deserialize)]
struct SubmissionBody {
    payload: SubmissionPayload,
}

#[derive(Deserialize)]
struct SubmissionPayload {
    email: Option<String>,
    #[serde(alias = "form-name")]
    form_name: Option<String>,
}

#[derive(Debug)]
struct SubmissionRequest {
    email: String,
    form_name: String,
}

/// Everything that can go wrong between receiving a submission and the
/// provider accepting it. The status mapping is fixed here, in one place;
/// failures are returned, never thrown for the platform to guess at.
#[derive(thiserror::Error)]
pub enum SubmissionError {
    /// 400; neither query nor body payload supplied the field
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// 400
    #[error("{0}")]
    ValidationError(String),

    /// 404
    #[error("Unknown form: {0}")]
    UnknownForm(String),

    /// 500
    #[error("Cannot forward submission: EMAIL_TOKEN is not configured")]
    MissingToken,

    /// 422; covers network errors, timeouts, and non-success provider statuses
    #[error("Could not forward submission to the subscription provider: {0}")]
    UpstreamFailure(#[source] reqwest::Error),
}

impl Debug for SubmissionError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)?;
        Ok(())
    }
}

impl ResponseError for SubmissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnknownForm(_) => StatusCode::NOT_FOUND,
            Self::MissingToken => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // the stringified error doubles as the response body; the full source
        // chain only appears in the operator log (see the `Debug` impl)
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// Pull `email` and `form_name` out of the request, preferring query
/// parameters. The body is only parsed when the query leaves a field
/// unfilled, so a fully query-supplied request ignores the body entirely,
/// malformed or not.
fn extract_submission(
    query: SubmissionQuery,
    body: &str,
) -> Result<SubmissionRequest, SubmissionError> {
    let SubmissionQuery { email, form_name } = query;

    let payload = match (&email, &form_name) {
        (Some(_), Some(_)) => None,
        _ => serde_json::from_str::<SubmissionBody>(body)
            .ok()
            .map(|b| b.payload),
    };

    let email = email
        .or_else(|| payload.as_ref().and_then(|p| p.email.clone()))
        .ok_or(SubmissionError::MissingParameter("email"))?;

    let form_name = form_name
        .or_else(|| payload.as_ref().and_then(|p| p.form_name.clone()))
        .ok_or(SubmissionError::MissingParameter("form_name"))?;

    Ok(SubmissionRequest { email, form_name })
}

/// `POST /hooks/submission-created`
///
/// Invoked by the hosting platform on every form submission. Extracts the two
/// fields, checks the form identity, and forwards the email to the
/// subscription provider.
///
/// # Request example
///
/// ```sh
///     curl -X POST 'http://127.0.0.1:8000/hooks/submission-created?email=a%40b.com&form-name=email-subscription'
/// ```
#[tracing::instrument(
    name = "Forwarding form submission",
    skip(query, body, client),
    fields(
        // recorded once extraction has succeeded
        email = tracing::field::Empty,
        form_name = tracing::field::Empty,
    )
)]
pub async fn submission_created(
    query: web::Query<SubmissionQuery>,
    body: String,
    // inherited via App.app_data
    client: web::Data<SubscriptionClient>,
) -> Result<HttpResponse, SubmissionError> {
    let submission = extract_submission(query.into_inner(), &body)?;

    tracing::Span::current().record("email", tracing::field::display(&submission.email));
    tracing::Span::current().record("form_name", tracing::field::display(&submission.form_name));

    if submission.form_name != RECOGNIZED_FORM {
        return Err(SubmissionError::UnknownForm(submission.form_name));
    }

    let email =
        SubscriberEmail::parse(submission.email).map_err(SubmissionError::ValidationError)?;

    client.subscribe(&email).await.map_err(|e| match e {
        ForwardError::MissingToken => SubmissionError::MissingToken,
        ForwardError::Request(e) => SubmissionError::UpstreamFailure(e),
    })?;

    Ok(HttpResponse::Ok().body(format!("Successfully subscribed {}", email.as_ref())))
}
