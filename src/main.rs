mod cli;
mod config;
mod dispatch;
mod error;
mod index;
mod package_manager;
mod record;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::PeakError;
use crate::index::IndexClient;
use crate::package_manager::{PackageManager, PipExecutor};

/// 默认过滤规则；-v 只提升 peakpip 自身的日志级别
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,peakpip=info"
    } else {
        "warn"
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG 优先
    let default_filter = default_log_filter(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let file_config = Config::load_or_default()?;
    let invocation = cli.resolve(&file_config)?;
    // 参数个数先于环境探测检查
    invocation.action.validate()?;

    let pm = PackageManager::detect(&file_config)?;
    log::info!("using {}", pm.name());

    let index = IndexClient::new(invocation.endpoints)?;
    log::debug!("index: {}", index.endpoints().index_url);

    let dispatcher = Dispatcher::new(invocation.operation, Arc::new(PipExecutor::new(&pm)), index);
    let mut stdout = std::io::stdout();
    dispatcher.dispatch(invocation.action, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", fatal_message(&e));
        std::process::exit(1);
    }
}

fn fatal_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PeakError>() {
        // 初始化错误自带前缀 "error initializing peakpip"
        Some(PeakError::Initialization(_)) => err.to_string(),
        _ => format!("error: {}", err),
    }
}
