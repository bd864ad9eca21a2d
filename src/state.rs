use crate::config::AppConfig;
use crate::services::email::EmailProvider;
use crate::storage::BookingStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Box<dyn BookingStore>,
    pub mailer: Box<dyn EmailProvider>,
}
