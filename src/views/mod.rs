pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod layout;
pub mod shared;

pub use auth::{AuthScreen, LoginView, SignupView};
pub use chat::{ChatLauncher, ChatWindow};
pub use dashboard::DashboardView;
pub use layout::DashboardShell;
