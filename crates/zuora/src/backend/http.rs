//! HTTPS backend for a Zuora tenant.
//!
//! Collections are read page by page: each page carries a `next` path that
//! is appended to the base URL until none is returned. Every request is
//! authenticated with a bearer token that is renewed once it expires.

use crate::auth::{Credentials, Token, request_token};
use crate::backend::Backend;
use crate::error::{Error, Result};
use reconcile::{Notification, Profile, Trigger};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use ureq::Body;
use ureq::http::Response;

/// Event trigger collection path.
pub const TRIGGERS_PATH: &str = "/events/event-triggers";

/// Notification definition collection path.
pub const NOTIFICATIONS_PATH: &str = "/notifications/notification-definitions";

/// ZOQL query path.
pub const QUERY_PATH: &str = "/v1/action/query";

const PROFILES_QUERY: &str = "SELECT Id, ProfileName FROM CommunicationProfile";

/// Overall timeout for a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Tenant API base URL, e.g. `https://rest.apisandbox.zuora.com`.
    pub base_url: String,
    pub credentials: Credentials,
}

/// Backend talking to a Zuora tenant over HTTPS.
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
    credentials: Credentials,
    token: Mutex<Option<Token>>,
}

impl HttpBackend {
    /// Create a backend for the given tenant.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "base URL must start with http:// or https:// (got '{}')",
                config.base_url
            )));
        }

        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_config),
            base_url,
            credentials: config.credentials,
            token: Mutex::new(None),
        })
    }

    /// Get the tenant base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token_slot(&self) -> MutexGuard<'_, Option<Token>> {
        match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Current bearer value, requesting a new token when needed.
    fn bearer(&self) -> Result<String> {
        let mut slot = self.token_slot();
        if let Some(token) = slot.as_ref()
            && !token.is_expired()
        {
            return Ok(token.value().to_string());
        }

        log::debug!("Requesting a new access token");
        let token = request_token(&self.agent, &self.base_url, &self.credentials)?;
        let value = token.value().to_string();
        *slot = Some(token);
        Ok(value)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        log::info!("GET {}", path);
        let response = self
            .agent
            .get(&self.url(path))
            .header("Authorization", format!("Bearer {}", self.bearer()?))
            .header("Content-Type", "application/json")
            .call()?;
        decode(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        log::info!("POST {}", path);
        let response = self
            .agent
            .post(&self.url(path))
            .header("Authorization", format!("Bearer {}", self.bearer()?))
            .header("Content-Type", "application/json")
            .send_json(body)?;
        decode(response)
    }

    fn delete(&self, path: &str) -> Result<()> {
        log::info!("DELETE {}", path);
        let response = self
            .agent
            .delete(&self.url(path))
            .header("Authorization", format!("Bearer {}", self.bearer()?))
            .header("Content-Type", "application/json")
            .call()?;
        check_status(response).map(|_| ())
    }

    /// Read every page of a collection.
    fn fetch_pages<T: DeserializeOwned>(&self, first: &str) -> Result<Vec<T>> {
        let mut result = Vec::new();
        let mut next = Some(first.to_string());

        while let Some(path) = next.take() {
            let page: Page<T> = self.get_json(&path)?;
            result.extend(page.data);
            next = page.next.filter(|n| !n.is_empty());
        }

        Ok(result)
    }
}

impl Backend for HttpBackend {
    fn fetch_triggers(&self) -> Result<Vec<Trigger>> {
        self.fetch_pages(TRIGGERS_PATH)
    }

    fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        self.fetch_pages(NOTIFICATIONS_PATH)
    }

    fn fetch_profiles(&self) -> Result<Vec<Profile>> {
        let response: QueryResponse<Profile> = self.post_json(
            QUERY_PATH,
            &QueryPayload {
                query_string: PROFILES_QUERY,
            },
        )?;
        response.into_records()
    }

    fn insert_trigger(&self, trigger: &Trigger) -> Result<String> {
        let created: Created = self.post_json(TRIGGERS_PATH, trigger)?;
        created.into_id()
    }

    fn destroy_trigger(&self, id: &str) -> Result<()> {
        self.delete(&format!("{TRIGGERS_PATH}/{id}"))
    }

    fn insert_notification(&self, notification: &Notification) -> Result<String> {
        let created: Created = self.post_json(NOTIFICATIONS_PATH, notification)?;
        created.into_id()
    }

    fn destroy_notification(&self, id: &str) -> Result<()> {
        self.delete(&format!("{NOTIFICATIONS_PATH}/{id}"))
    }
}

/// Turn a non-success response into [`Error::Api`] with its body.
fn check_status(mut response: Response<Body>) -> Result<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(Error::api(status.as_u16(), body.trim()))
}

fn decode<T: DeserializeOwned>(response: Response<Body>) -> Result<T> {
    let mut response = check_status(response)?;
    let text = response.body_mut().read_to_string()?;
    Ok(serde_json::from_str(&text)?)
}

// =============================================================================
// Zuora API wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryPayload<'a> {
    query_string: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    #[serde(default = "Vec::new")]
    records: Vec<T>,
    done: bool,
    #[serde(default)]
    size: usize,
}

impl<T> QueryResponse<T> {
    fn into_records(self) -> Result<Vec<T>> {
        if !self.done {
            return Err(Error::IncompleteQuery {
                returned: self.records.len(),
            });
        }
        log::debug!("query returned {} records", self.size);
        Ok(self.records)
    }
}

#[derive(Debug, Deserialize)]
struct Created {
    #[serde(default)]
    id: Option<String>,
}

impl Created {
    fn into_id(self) -> Result<String> {
        self.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidResponse("create response carries no id".to_string()))
    }
}
