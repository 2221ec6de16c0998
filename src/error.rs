//! 错误类型

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeakError {
    /// 启动时找不到 python / pip
    #[error("error initializing peakpip: {0}")]
    Initialization(String),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 索引返回非 2xx
    #[error("package not found: {name} (status {status})")]
    NotFound { name: String, status: u16 },

    #[error("failed to decode package info for {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// pip 以非零状态退出
    #[error("{program} exited with {}", describe_code(.code))]
    Subprocess { program: String, code: Option<i32> },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),

    #[error("invalid config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("background task failed: {0}")]
    Task(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// 多包命令中某一个包失败，剩余的包不再处理
    #[error("failed to {action} {target}: {source}")]
    Failed {
        action: &'static str,
        target: String,
        #[source]
        source: Box<PeakError>,
    },
}

impl PeakError {
    pub fn failed(action: &'static str, target: impl Into<String>, source: PeakError) -> Self {
        PeakError::Failed {
            action,
            target: target.into(),
            source: Box::new(source),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, PeakError>;
