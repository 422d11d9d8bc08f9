use super::client::ApiClient;
use super::error::ApiResult;
use crate::types::{AuthResponse, User};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

/// Authentication calls against the task API.
#[derive(Clone)]
pub struct SessionService {
    client: ApiClient,
}

impl SessionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post("/signin", &SignInRequest { email, password })
            .await?;
        self.client.tokens().set(&response.token)?;
        info!(user_id = %response.user.id, "signed in");
        Ok(response)
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post(
                "/signup",
                &SignUpRequest {
                    email,
                    password,
                    name,
                },
            )
            .await?;
        self.client.tokens().set(&response.token)?;
        info!(user_id = %response.user.id, "account created");
        Ok(response)
    }

    /// Client-side only; the server keeps no session to invalidate.
    pub fn logout(&self) {
        if let Err(err) = self.client.tokens().clear() {
            warn!("failed to clear session token: {err}");
        }
    }

    pub async fn profile(&self) -> ApiResult<User> {
        self.client.get("/me").await
    }

    /// Presence check only. An expired token still counts until a call fails.
    pub fn is_authenticated(&self) -> bool {
        self.client.tokens().is_present()
    }
}
