use serde::Deserialize;
use sourcely_admin::DEFAULT_PAGE_SIZE;
use sourcely_logger::LogSettings;

/// 站点配置，对应 `config/site.yaml`，所有字段都有默认值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerSettings,
    pub i18n: I18nSettings,
    pub admin: AdminSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// `dir` 为空时使用编译期嵌入的语言包
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// 远程 REST API 前缀，如 `http://localhost:5000/api`
    pub api_base: String,
    pub page_size: usize,
    pub timeout_secs: u64,
    /// 服务端预置的管理员 token，请求未携带时使用
    pub token: Option<String>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 15,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: "./data/client.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcely_core::yaml;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: SiteConfig = yaml::load_from_str(
            "server:\n  addr: 127.0.0.1:9000\nadmin:\n  token: ${SOURCELY_TEST_NO_TOKEN:}\n",
        )
        .unwrap();
        assert_eq!(config.server.addr, "127.0.0.1:9000");
        assert_eq!(config.admin.api_base, "http://localhost:5000/api");
        assert_eq!(config.admin.page_size, 10);
        assert_eq!(config.admin.token, None);
        assert_eq!(config.storage.path, "./data/client.json");
        assert_eq!(config.log.level, "info");
        assert!(config.i18n.dir.is_none());
    }

    #[test]
    fn bundled_config_parses() {
        let config = sourcely_core::include_yaml!("../config/site.yaml", SiteConfig).unwrap();
        assert!(!config.server.addr.is_empty());
        assert!(config.admin.timeout_secs > 0);
    }
}
