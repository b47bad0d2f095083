//! YAML 配置加载，支持 `${VAR}` / `${VAR:default}` 环境变量占位符

use dotenvy::dotenv;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// 替换内容中的环境变量占位符，未设置且无默认值时替换为空串
fn replace_vars(yaml_content: &str) -> String {
    // 生产环境通常没有 .env 文件
    let _ = dotenv();

    static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Z0-9_]+)(?::([^\}]*))?\}").expect("Invalid regex pattern")
    });

    re.replace_all(yaml_content, |caps: &regex::Captures| {
        let default = caps.get(2).map(|m| m.as_str());
        env::var(&caps[1]).unwrap_or_else(|_| default.unwrap_or("").to_string())
    })
    .into_owned()
}

pub fn load_from_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str<T: DeserializeOwned>(yaml_content: &str) -> Result<T, ConfigError> {
    Ok(serde_yaml::from_str(&replace_vars(yaml_content))?)
}

/// 文件不存在时返回 `T::default()`，其余错误照常返回
pub fn load_or_default<T, P>(path: P) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        log::info!("Config file {} not found, using defaults", path.display());
        return Ok(T::default());
    }
    load_from_file(path)
}

/// 编译时嵌入 YAML 文件
#[macro_export]
macro_rules! include_yaml {
    ($path:expr, $t:ty) => {
        $crate::yaml::load_from_str::<$t>(include_str!($path))
    };
}

pub use include_yaml;
