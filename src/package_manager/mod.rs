//! 包管理器模块：对 pip 的封装

pub mod args;
pub mod executor;
pub mod types;

pub use executor::{Executor, PipExecutor};
pub use types::OutputMode;

use crate::config::Config;
use crate::error::{PeakError, Result};
use std::path::{Path, PathBuf};

/// 启动时探测到的 python / pip 可执行文件
#[derive(Debug, Clone)]
pub struct PackageManager {
    pub python: PathBuf,
    pub pip: PathBuf,
    /// 为 true 时以 `python -m pip` 调用
    pub python_module: bool,
}

impl PackageManager {
    /// 按优先级检测: python3 -> python, pip3 -> pip；配置文件中的显式路径优先
    pub fn detect(config: &Config) -> Result<Self> {
        let python = match &config.python {
            Some(path) => resolve_configured(path, "python")?,
            None => find_first(&["python3", "python"]).ok_or_else(|| {
                PeakError::Initialization("python executable not found in PATH".to_string())
            })?,
        };

        let pip = match &config.pip {
            Some(path) => resolve_configured(path, "pip")?,
            None => match find_first(&["pip3", "pip"]) {
                Some(path) => path,
                // `python -m pip` 不需要独立的 pip 可执行文件
                None if config.python_module => PathBuf::from("pip"),
                None => {
                    return Err(PeakError::Initialization(
                        "pip executable not found in PATH".to_string(),
                    ))
                }
            },
        };

        log::debug!("python: {}", python.display());
        log::debug!("pip: {}", pip.display());

        Ok(Self {
            python,
            pip,
            python_module: config.python_module,
        })
    }

    pub fn name(&self) -> String {
        if self.python_module {
            format!("{} -m pip", self.python.display())
        } else {
            self.pip.display().to_string()
        }
    }

    /// 实际要执行的程序和它的前置参数
    pub fn program(&self) -> (PathBuf, Vec<String>) {
        if self.python_module {
            (
                self.python.clone(),
                vec!["-m".to_string(), "pip".to_string()],
            )
        } else {
            (self.pip.clone(), Vec::new())
        }
    }
}

/// 配置中的裸命令名（如 `pip3`）按 PATH 查找，带目录的路径原样使用
fn resolve_configured(path: &Path, kind: &str) -> Result<PathBuf> {
    if path.components().count() != 1 || path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    which::which(path).map_err(|_| {
        PeakError::Initialization(format!(
            "{} executable {} not found in PATH",
            kind,
            path.display()
        ))
    })
}

fn find_first(candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().find_map(|name| which::which(name).ok())
}
