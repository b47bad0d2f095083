use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sourcely_admin::ApiClient;
use sourcely_axum::{AppState, SiteConfig, WebServer, routes};
use sourcely_axum_macro::i18n_assets;
use sourcely_core::storage::TOKEN_KEY;
use sourcely_core::{ClientStorage, FileStorage, Translator, i18n, yaml};
use sourcely_logger::LoggerConfig;

i18n_assets!("locales");

const CONFIG_ENV: &str = "SOURCELY_CONFIG";
const DEFAULT_CONFIG: &str = "config/site.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config: SiteConfig = yaml::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;

    let _guard = LoggerConfig::from(&config.log).init();
    log::info!("Loaded config from {}", config_path);

    let translator = translator(&config)?;
    log::info!("Locales ready: {:?}", translator.languages());

    let storage = Arc::new(FileStorage::new(&config.storage.path));
    if let Some(token) = config.admin.token.as_deref().filter(|t| !t.is_empty()) {
        storage
            .set(TOKEN_KEY, token)
            .context("failed to seed admin token")?;
    }

    let client = ApiClient::with_timeout(
        config.admin.api_base.clone(),
        Duration::from_secs(config.admin.timeout_secs),
    )?;
    let state = AppState::new(translator, client, storage, config.admin.page_size);

    WebServer::new(config.server.addr.clone())
        .mount(routes::router(state))
        .layer_i18n()
        .start()
        .await
}

/// 配置了 `i18n.dir` 时从目录加载，否则使用嵌入的语言包
fn translator(config: &SiteConfig) -> anyhow::Result<&'static Translator> {
    if let Some(dir) = config.i18n.dir.as_deref() {
        let loaded = Translator::load_dir(dir)
            .with_context(|| format!("failed to load locales from {dir}"))?;
        // 路由状态持有 'static 引用，进程内只加载一次
        return Ok(Box::leak(Box::new(loaded)));
    }
    i18n::global().context("embedded locales were not installed")
}
