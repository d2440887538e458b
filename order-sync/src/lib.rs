//! Order Sync - 分类显示顺序同步服务
//!
//! 每个分类范围 (scope) 维护一个用户自定义的显示顺序，并与实时分类集合保持一致：
//!
//! - **存储** (`store`): 本地 redb / 远程账户 API，按会话选择
//! - **同步** (`sync`): 存储顺序与实时分类的对账算法、默认排序策略
//! - **控制器** (`controller`): 每个 scope 一个 actor，负责加载、对账、保存
//! - **服务** (`service`): 三个 scope 的控制器生命周期
//!
//! # 模块结构
//!
//! ```text
//! order-sync/src/
//! ├── config.rs      # 环境变量配置
//! ├── error.rs       # StoreError / SyncError
//! ├── logger.rs      # tracing 初始化、日志清理
//! ├── tasks.rs       # 后台任务管理
//! ├── store/         # OrderStore trait 与后端实现
//! ├── sync/          # reconcile + DefaultOrderPolicy
//! ├── controller/    # OrderController actor、handle、view
//! └── service.rs     # OrderSyncService
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod service;
pub mod store;
pub mod sync;
pub mod tasks;

pub use config::Config;
pub use controller::{CategoryFeed, OrderControllerHandle, OrderView, Phase};
pub use error::{StoreError, StoreResult, SyncError, SyncResult};
pub use service::{CategoryFeeds, CategorySnapshot, OrderSyncService};
pub use store::{OrderStore, Session, StoreFactory};
pub use sync::{DefaultOrderPolicy, PolicySet, default_order, reconcile};

// Re-export shared types
pub use shared::error::{AppError, ErrorCode};
pub use shared::models::{CategoryName, OrderList, Scope};

pub use logger::{cleanup_old_logs, init_logger_with_file};

/// 设置运行环境: dotenv、工作目录、日志
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();

    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = config.log_dir.clone().or_else(|| {
        config
            .is_production()
            .then(|| config.work_dir.join("logs").to_string_lossy().into_owned())
    });
    init_logger_with_file(&config.log_level, config.log_json, log_dir.as_deref())?;

    Ok(config)
}
