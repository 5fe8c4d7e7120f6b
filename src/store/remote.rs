/// Remote persistence adapter for authenticated mode
///
/// One HTTP request per operation against the API server, no retries. The
/// transport applies a 30 second timeout; an expired or otherwise failed
/// request surfaces as a `Remote` error with no status, a non-success
/// response as a `Remote` error carrying the status and the server's
/// `{"error": ...}` message. Server-side writes are plain last-write-wins
/// row operations with no concurrency token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{
    Identity, ReadingReminder, ReminderDraft, ReminderPatch, Task, TaskDraft, TaskPatch, UserId,
};
use crate::store::{EntityStore, StoreError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one API server
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

/// Error body shape shared by every endpoint
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: AuthUser,
}

/// The slice of the user record this layer consumes; the server also returns
/// profile fields we have no use for
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

impl RemoteStore {
    /// Build a store for the given server base URL (scheme + authority,
    /// trailing slashes tolerated)
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pass a success response through, turn anything else into a `Remote`
    /// error with the decoded server message
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        tracing::warn!("Remote request failed with status {}: {}", status, message);
        Err(StoreError::Remote {
            status: Some(status.as_u16()),
            message,
        })
    }

    /// Serialize a draft and attach the owning `userId`
    fn owned_body<T: serde::Serialize>(
        draft: &T,
        owner: &Identity,
    ) -> Result<Value, StoreError> {
        let mut body = serde_json::to_value(draft)?;
        if let Some(object) = body.as_object_mut() {
            object.insert("userId".to_string(), json!(owner.as_owner_param()));
        }
        Ok(body)
    }

    /// Exchange credentials for the authenticated identity
    pub async fn login(&self, email: &str, password: &str) -> Result<UserId, StoreError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        tracing::info!("Logged in as user {}", auth.user.id);
        Ok(UserId(auth.user.id))
    }

    /// Create an account and return the new identity
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<UserId, StoreError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password, "name": name }))
            .send()
            .await?;
        let auth: AuthResponse = Self::check(response).await?.json().await?;
        Ok(UserId(auth.user.id))
    }
}

#[async_trait]
impl EntityStore for RemoteStore {
    async fn list_tasks(&self, owner: &Identity) -> Result<Vec<Task>, StoreError> {
        let response = self
            .client
            .get(self.url("/tasks"))
            .query(&[("userId", owner.as_owner_param())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_task(&self, owner: &Identity, draft: &TaskDraft) -> Result<Task, StoreError> {
        let body = Self::owned_body(draft, owner)?;
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_task(
        &self,
        _owner: &Identity,
        id: &str,
        patch: &TaskPatch,
    ) -> Result<Task, StoreError> {
        let response = self
            .client
            .patch(self.url(&format!("/tasks/{}", id)))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_task(&self, _owner: &Identity, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_reminders(&self, owner: &Identity) -> Result<Vec<ReadingReminder>, StoreError> {
        let response = self
            .client
            .get(self.url("/quran-reminders"))
            .query(&[("userId", owner.as_owner_param())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_reminder(
        &self,
        owner: &Identity,
        draft: &ReminderDraft,
        surah_name: &str,
    ) -> Result<ReadingReminder, StoreError> {
        let mut body = Self::owned_body(draft, owner)?;
        if let Some(object) = body.as_object_mut() {
            object.insert("surahName".to_string(), json!(surah_name));
        }
        let response = self
            .client
            .post(self.url("/quran-reminders"))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_reminder(
        &self,
        _owner: &Identity,
        id: &str,
        patch: &ReminderPatch,
    ) -> Result<ReadingReminder, StoreError> {
        let response = self
            .client
            .patch(self.url(&format!("/quran-reminders/{}", id)))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_reminder(&self, _owner: &Identity, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/quran-reminders/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
