use std::path::PathBuf;
use std::time::Duration;

use crate::store::Session;

/// 服务配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (本地数据库、日志) |
/// | ORDER_DB_FILE | order-sync.redb | 本地数据库文件名 |
/// | REMOTE_BASE_URL | http://localhost:3001 | 远程偏好服务地址 |
/// | ACCOUNT_ID | - | 已登录账户 ID |
/// | AUTH_TOKEN | - | 已登录账户令牌 |
/// | REQUEST_TIMEOUT_MS | 30000 | 远程请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 5000 | 关闭超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_DIR | - | 日志文件目录 |
/// | CATEGORIES_FILE | categories.json | 分类快照文件 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// `ACCOUNT_ID` and `AUTH_TOKEN` together form the authenticated session;
/// if either is missing the caller is anonymous and orders stay on this device.
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub db_file: String,
    pub remote_base_url: String,
    pub account_id: Option<String>,
    pub auth_token: Option<String>,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub categories_file: PathBuf,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "./work_dir".into())
                .into(),
            db_file: std::env::var("ORDER_DB_FILE").unwrap_or_else(|_| "order-sync.redb".into()),
            remote_base_url: std::env::var("REMOTE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            account_id: non_empty_var("ACCOUNT_ID"),
            auth_token: non_empty_var("AUTH_TOKEN"),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: non_empty_var("LOG_DIR"),
            categories_file: std::env::var("CATEGORIES_FILE")
                .unwrap_or_else(|_| "categories.json".into())
                .into(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Path of the device-local order database
    pub fn db_path(&self) -> PathBuf {
        self.work_dir.join(&self.db_file)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// The authentication signal, read once per activation
    pub fn session(&self) -> Option<Session> {
        match (&self.account_id, &self.auth_token) {
            (Some(account_id), Some(token)) => Some(Session::new(account_id, token)),
            _ => None,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
