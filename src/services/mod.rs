pub mod notification_service;
pub mod oauth_service;

pub use notification_service::NotificationService;
pub use oauth_service::OAuthService;
