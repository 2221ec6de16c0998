use crate::error::{PeakError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";
pub const DEFAULT_SIMPLE_URL: &str = "https://pypi.org/simple";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONCURRENCY: usize = 10;

/// 用户配置文件 (~/.config/peakpip/config.toml)，所有字段可选
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub index_url: String,
    pub simple_url: String,
    pub timeout_secs: u64,
    pub concurrent: usize,
    /// 显式指定 pip 路径，跳过 PATH 查找
    pub pip: Option<PathBuf>,
    pub python: Option<PathBuf>,
    /// 以 `python -m pip` 方式调用
    pub python_module: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            simple_url: DEFAULT_SIMPLE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrent: DEFAULT_CONCURRENCY,
            pip: None,
            python: None,
            python_module: false,
        }
    }
}

impl Config {
    /// 配置文件路径：PEAKPIP_CONFIG 优先，否则 $HOME/.config/peakpip/config.toml
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("PEAKPIP_CONFIG") {
            return PathBuf::from(path);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/peakpip/config.toml")
    }

    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| PeakError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| PeakError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.concurrent == 0 {
            return Err(PeakError::Config {
                path: path.to_path_buf(),
                message: "concurrent must be at least 1".to_string(),
            });
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// 单次命令的行为选项，解析参数后构造一次，之后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationConfig {
    pub quiet: bool,
    pub verbose: bool,
    pub dry_run: bool,
    pub user_install: bool,
    pub target: Option<PathBuf>,
    pub concurrent: usize,
}

impl Default for OperationConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            verbose: false,
            dry_run: false,
            user_install: false,
            target: None,
            concurrent: DEFAULT_CONCURRENCY,
        }
    }
}

impl OperationConfig {
    /// pip 的输出级别参数（--quiet / --verbose）
    pub fn verbosity_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.quiet {
            args.push("--quiet".to_string());
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }
        args
    }
}
