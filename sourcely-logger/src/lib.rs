use log::error;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "sourcely.log";
const DEFAULT_LEVEL: &str = "info";
const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// 配置文件中的 `log` 段
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// 日志级别或 env-filter 指令，如 `info,sourcely_admin=debug`
    pub level: String,
    pub dir: String,
    pub file_prefix: String,
    pub console: bool,
    pub file: bool,
    pub max_files: Option<i16>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            dir: DEFAULT_LOG_DIR.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            console: true,
            file: true,
            max_files: Some(14),
        }
    }
}

/// 日志配置构建器
///
/// 控制台与按天滚动的文件输出，可选地定期删除超出保留数量的旧日志文件。
/// 设置了 `RUST_LOG` 时以其为准，否则使用 `level`。
pub struct LoggerConfig {
    file_prefix: String,
    log_dir: PathBuf,
    time_format: String,
    level: String,
    console: bool,
    file: bool,
    max_files: Option<i16>,
    cleanup_interval: Duration,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            console: true,
            file: true,
            max_files: None,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl From<&LogSettings> for LoggerConfig {
    fn from(settings: &LogSettings) -> Self {
        let config = LoggerConfig::new()
            .level(&settings.level)
            .log_dir(&settings.dir)
            .file_prefix(&settings.file_prefix)
            .enable_console(settings.console)
            .enable_file(settings.file);
        match settings.max_files {
            Some(count) => config.max_files(count),
            None => config,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 滚动日志文件名为 `<prefix>.<日期>`
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// chrono strftime 格式
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.console = enable;
        self
    }

    pub fn enable_file(mut self, enable: bool) -> Self {
        self.file = enable;
        self
    }

    pub fn max_files(mut self, count: i16) -> Self {
        self.max_files = Some(count);
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// 注册全局 subscriber，并在配置了 `max_files` 时启动清理线程。
    ///
    /// 返回的 guard 需要一直持有，否则文件日志可能在退出前丢失。
    pub fn init(self) -> Option<WorkerGuard> {
        let filter = self.build_filter();
        let console_layer = self.build_console_layer();
        let (file_layer, guard) = self.build_file_layer();

        // log 宏的输出经由 tracing-log 桥接进入同一个 subscriber
        Registry::default()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        self.spawn_cleanup_task_if_needed();

        guard
    }

    fn build_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }

    fn build_console_layer<S>(&self) -> Option<impl Layer<S>>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        self.console.then(|| {
            fmt::layer()
                .with_timer(ChronoLocal::new(self.time_format.clone()))
                .with_writer(std::io::stdout)
        })
    }

    fn build_file_layer<S>(&self) -> (Option<impl Layer<S>>, Option<WorkerGuard>)
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        if !self.file {
            return (None, None);
        }

        let file_appender = tracing_appender::rolling::daily(&self.log_dir, &self.file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_timer(ChronoLocal::new(self.time_format.clone()))
            .with_ansi(false)
            .with_writer(non_blocking);

        (Some(layer), Some(guard))
    }

    fn spawn_cleanup_task_if_needed(&self) {
        let Some(max_files) = self.max_files else {
            return;
        };
        if !self.file {
            return;
        }

        let log_dir = self.log_dir.clone();
        let file_prefix = self.file_prefix.clone();
        let interval = self.cleanup_interval;
        let keep = usize::try_from(max_files).unwrap_or(0);

        std::thread::spawn(move || {
            loop {
                cleanup_old_logs(&log_dir, &file_prefix, keep);
                std::thread::sleep(interval);
            }
        });
    }
}

/// 只保留最新的 `max_files` 个日志文件
fn cleanup_old_logs(log_dir: &Path, file_prefix: &str, max_files: usize) {
    if !log_dir.exists() {
        return;
    }

    let read_dir = match std::fs::read_dir(log_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to read log directory: {}", e);
            return;
        }
    };

    let mut log_files: Vec<_> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let file_name = entry.file_name().into_string().ok()?;
            file_name
                .starts_with(file_prefix)
                .then_some((entry, file_name))
        })
        .collect();

    // 日期后缀为 ISO 8601，按文件名降序即按时间从新到旧
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (entry, _) in log_files.iter().skip(max_files) {
        if let Err(e) = std::fs::remove_file(entry.path()) {
            error!("Failed to remove old log file {:?}: {}", entry.path(), e);
        }
    }
}
