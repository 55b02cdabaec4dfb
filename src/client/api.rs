//! Backend API Client
//!
//! One `reqwest::Client` shared by every endpoint. Each call carries the
//! shared application credential twice, as a bearer `Authorization` header and
//! as a `pass` body field, because the backend checks one or the other
//! depending on the endpoint. The user is identified by a `user_id` body field
//! supplied by the caller.
//!
//! Replies are interpreted in two steps: the status envelope first, then the
//! endpoint payload. A reply whose `status` is not success becomes
//! [`ClientError::Backend`] carrying the backend's own message.

use crate::client::config::Config;
use crate::shared::error::ClientError;
use crate::shared::wire::Envelope;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body with the shared credential merged in
#[derive(Serialize)]
struct Credentialed<'a, B> {
    pass: &'a str,
    #[serde(flatten)]
    body: &'a B,
}

/// HTTP client for the attendance backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// POST a JSON body to `path` and decode a successful reply as `R`
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.config.api_url(path);
        tracing::debug!(path, "POST");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.pass())
            .json(&Credentialed {
                pass: self.config.pass(),
                body,
            })
            .send()
            .await?;

        read_reply(path, response).await
    }

    /// GET `path` with query parameters and decode a successful reply as `R`
    pub async fn get<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = self.config.api_url(path);
        tracing::debug!(path, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.pass())
            .query(query)
            .send()
            .await?;

        read_reply(path, response).await
    }

    /// POST like [`post`](Self::post) but leave the `status` flag to the caller
    pub async fn post_unchecked<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.config.api_url(path);
        tracing::debug!(path, "POST");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.pass())
            .json(&Credentialed {
                pass: self.config.pass(),
                body,
            })
            .send()
            .await?;

        read_raw(response).await
    }

    /// GET an absolute URL whose reply does not follow the status envelope
    pub async fn get_raw<R>(&self, url: &str, query: &[(&str, &str)]) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).query(query).send().await?;
        read_raw(response).await
    }
}

async fn read_raw<R>(response: Response) -> Result<R, ClientError>
where
    R: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<R>().await?)
}

async fn read_reply<R>(path: &str, response: Response) -> Result<R, ClientError>
where
    R: DeserializeOwned,
{
    let status = response.status();
    let text = response.text().await?;

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: if text.is_empty() { status.to_string() } else { text },
            })
        }
        Err(e) => return Err(ClientError::Decode(e)),
    };

    let envelope = Envelope::deserialize(&value)?;
    if !envelope.status.is_success() {
        if !status.is_success() && envelope.message.is_none() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        tracing::debug!(path, http_status = status.as_u16(), "status flag not success");
        return Err(ClientError::backend(envelope.message));
    }

    Ok(serde_json::from_value(value)?)
}
