/// Remote API access.
///
/// - `client` - bearer-token JSON client shared by every service
/// - `session` - sign in, sign up, profile
/// - `tasks` - task CRUD
/// - `chat` - conversations and assistant replies
mod client;
mod error;

pub mod chat;
pub mod session;
pub mod tasks;

pub use chat::ChatService;
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use session::SessionService;
pub use tasks::{Deleted, TaskService};

use crate::config::AppConfig;
use crate::storage::TokenStore;

/// Every service the app talks to, wired to one token store.
#[derive(Clone)]
pub struct Services {
    pub session: SessionService,
    pub tasks: TaskService,
    pub chat: ChatService,
}

impl Services {
    pub fn new(config: &AppConfig, tokens: TokenStore) -> Self {
        let http = reqwest::Client::new();
        let api = ApiClient::with_http(http.clone(), &config.api_url, tokens.clone());
        let chat = ApiClient::with_http(http, &config.chat_url, tokens);
        Self {
            session: SessionService::new(api.clone()),
            tasks: TaskService::new(api),
            chat: ChatService::new(chat),
        }
    }
}
