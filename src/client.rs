//! HTTP client for the link API. [`ApiClient`] is the production
//! [`SubmitHandler`] behind the link form.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::LinkError;
use crate::form::SubmitHandler;
use crate::models::{
    ClicksResponse, CreatedLink, ErrorResponse, LinkRequest, ShortUrlResponse, TimePeriod,
};
use crate::validation::{Field, ValidationError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, LinkError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| LinkError::Network(format!("could not build http client ({err})")))?;

        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| LinkError::Network(format!("invalid api base url '{base_url}'")))?;

        Ok(Self { client, base_url })
    }

    /// The base URL extended by `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn list_links(&self) -> Result<Vec<ShortUrlResponse>, LinkError> {
        let response = send(self.client.get(self.url(&["links"]))).await?;
        expect_json(response, &[StatusCode::OK]).await
    }

    pub async fn get_link(&self, slug: &str) -> Result<ShortUrlResponse, LinkError> {
        let response = send(self.client.get(self.url(&["links", slug]))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LinkError::NotFound(slug.to_owned()));
        }
        expect_json(response, &[StatusCode::OK]).await
    }

    pub async fn delete_link(&self, slug: &str) -> Result<(), LinkError> {
        let response = send(self.client.delete(self.url(&["links", slug]))).await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(LinkError::NotFound(slug.to_owned())),
            _ => Err(unexpected(response).await),
        }
    }

    pub async fn clicks(
        &self,
        slug: &str,
        period: TimePeriod,
    ) -> Result<ClicksResponse, LinkError> {
        let request = self
            .client
            .get(self.url(&["links", slug, "clicks"]))
            .query(&[("timePeriod", period.as_str())]);
        let response = send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LinkError::NotFound(slug.to_owned()));
        }
        expect_json(response, &[StatusCode::OK]).await
    }
}

#[async_trait]
impl SubmitHandler for ApiClient {
    async fn create_link(&self, request: &LinkRequest) -> Result<CreatedLink, LinkError> {
        let response = send(self.client.post(self.url(&["links"])).json(request)).await?;

        match response.status() {
            StatusCode::CONFLICT => {
                let (field, reason) = first_field_error(response)
                    .await
                    .unwrap_or((Field::Slug, "already exists".to_owned()));
                Err(LinkError::Conflict { field, reason })
            }
            StatusCode::BAD_REQUEST => {
                let (field, reason) = first_field_error(response)
                    .await
                    .unwrap_or((Field::LongUrl, "invalid".to_owned()));
                Err(ValidationError::Rejected { field, reason }.into())
            }
            _ => expect_json(response, &[StatusCode::CREATED, StatusCode::OK]).await,
        }
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, LinkError> {
    request.send().await.map_err(|err| {
        if err.is_timeout() {
            LinkError::Network("request timed out".to_owned())
        } else {
            LinkError::Network(err.to_string())
        }
    })
}

async fn expect_json<T: DeserializeOwned>(
    response: reqwest::Response,
    ok: &[StatusCode],
) -> Result<T, LinkError> {
    let status = response.status();
    if !ok.contains(&status) {
        return Err(unexpected(response).await);
    }
    response.json::<T>().await.map_err(|err| LinkError::Server {
        status: status.as_u16(),
        message: format!("could not decode response ({err})"),
    })
}

async fn unexpected(response: reqwest::Response) -> LinkError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => body.message,
        Err(_) if text.is_empty() => format!("unexpected status {status}"),
        Err(_) => text,
    };
    LinkError::Server { status, message }
}

async fn first_field_error(response: reqwest::Response) -> Option<(Field, String)> {
    let body = response.json::<ErrorResponse>().await.ok()?;
    match body.errors.into_iter().next() {
        Some(err) => Some((err.field, err.reason)),
        None if !body.message.is_empty() => Some((Field::LongUrl, body.message)),
        None => None,
    }
}
