pub mod config;
pub mod i18n;
pub mod resp;
pub mod routes;
pub mod server;
pub mod state;

pub use config::SiteConfig;
pub use server::WebServer;
pub use state::AppState;
