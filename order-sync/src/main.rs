use std::path::Path;

use anyhow::Context;
use order_sync::{
    CategoryFeeds, CategorySnapshot, OrderSyncService, OrderView, PolicySet, Scope, StoreFactory,
    setup_environment,
};

/// What to do once every scope is Ready
enum Action {
    Show,
    Reset(Scope),
    Move { scope: Scope, from: usize, to: usize },
}

impl Action {
    fn from_args(args: &[String]) -> anyhow::Result<Self> {
        match args {
            [] => Ok(Action::Show),
            [cmd, scope] if cmd == "reset" => Ok(Action::Reset(scope.parse()?)),
            [cmd, scope, from, to] if cmd == "move" => Ok(Action::Move {
                scope: scope.parse()?,
                from: from.parse().context("invalid <from> index")?,
                to: to.parse().context("invalid <to> index")?,
            }),
            _ => anyhow::bail!("usage: order-sync [reset <scope> | move <scope> <from> <to>]"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let action = Action::from_args(&args)?;

    tracing::info!(environment = %config.environment, "Order sync starting...");

    // 2. 按会话选择存储后端
    let factory = StoreFactory::from_config(&config)?;
    let store = factory.for_session(config.session().as_ref())?;

    // 3. 实时分类快照
    let snapshot = read_snapshot(&config.categories_file)?;
    let feeds = CategoryFeeds::new();

    // 4. 启动控制器并对账
    let service = OrderSyncService::start(store, PolicySet::default(), &feeds);
    feeds.publish(&snapshot);
    service.wait_ready().await?;

    let result = run_action(&service, action).await;

    service.flush().await?;
    let views = service.views();
    service.shutdown(config.shutdown_timeout()).await;

    result?;
    print_views(&views)?;
    Ok(())
}

async fn run_action(service: &OrderSyncService, action: Action) -> anyhow::Result<()> {
    match action {
        Action::Show => {}
        Action::Reset(scope) => {
            let order = service
                .controller(scope)
                .reset_order()
                .await
                .map_err(|e| anyhow::anyhow!(e.to_app_error()))?;
            tracing::info!(%scope, len = order.len(), "Order reset");
        }
        Action::Move { scope, from, to } => {
            let order = service
                .controller(scope)
                .move_item(from, to)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_app_error()))?;
            tracing::info!(%scope, from, to, len = order.len(), "Entry moved");
        }
    }
    Ok(())
}

/// Load the live category snapshot
///
/// The CLI is one-shot, so a scope missing from the file is taken as empty.
fn read_snapshot(path: &Path) -> anyhow::Result<CategorySnapshot> {
    let mut snapshot: CategorySnapshot = if path.exists() {
        let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))?
    } else {
        tracing::warn!(path = %path.display(), "Categories file not found, using empty snapshot");
        CategorySnapshot::default()
    };

    for names in [
        &mut snapshot.status_active,
        &mut snapshot.status_archive,
        &mut snapshot.vertical,
    ] {
        names.get_or_insert_with(Vec::new);
    }
    Ok(snapshot)
}

fn print_views(views: &[OrderView]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(views)?);
    for view in views {
        if let Some(err) = &view.error {
            eprintln!("warning: {}: {}", view.scope, err);
        }
    }
    Ok(())
}
