use super::observable::Observable;
use crate::api::{ApiResult, SessionService};
use crate::types::User;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until the stored token has been checked.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Current user plus the auth operations the views call.
#[derive(Clone)]
pub struct SessionContext {
    service: SessionService,
    state: Observable<SessionState>,
}

impl SessionContext {
    pub fn new(service: SessionService) -> Self {
        Self {
            service,
            state: Observable::new(SessionState::default()),
        }
    }

    pub fn state(&self) -> &Observable<SessionState> {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.get()
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(SessionState::is_authenticated)
    }

    /// Resumes a stored session. Any failure drops the token; this is the
    /// only recovery path for a stale session.
    pub async fn restore(&self) {
        let user = if self.service.is_authenticated() {
            match self.service.profile().await {
                Ok(user) => Some(user),
                Err(err) => {
                    if err.is_unauthorized() {
                        info!("stored session expired, signing out");
                    } else {
                        warn!("session restore failed, signing out: {err}");
                    }
                    self.service.logout();
                    None
                }
            }
        } else {
            None
        };

        self.state.update(|state| {
            state.user = user;
            state.loading = false;
        });
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let response = self.service.login(email.trim(), password).await?;
        self.state.update(|state| {
            state.user = Some(response.user.clone());
            state.loading = false;
        });
        Ok(response.user)
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> ApiResult<User> {
        let response = self
            .service
            .signup(email.trim(), password, name.trim())
            .await?;
        self.state.update(|state| {
            state.user = Some(response.user.clone());
            state.loading = false;
        });
        Ok(response.user)
    }

    pub fn logout(&self) {
        self.service.logout();
        self.state.update(|state| state.user = None);
    }
}
