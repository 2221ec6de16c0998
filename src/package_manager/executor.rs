//! pip 子进程执行

use super::types::{CommandOutcome, OutputMode};
use super::PackageManager;
use crate::error::{PeakError, Result};
use std::path::PathBuf;

/// 运行 pip 的抽象，测试中用假实现替换
pub trait Executor: Send + Sync {
    /// 以给定参数运行 pip，非零退出不算错误，由调用方根据 outcome 判断
    fn run(&self, args: &[String], mode: OutputMode) -> Result<CommandOutcome>;

    /// 用于错误信息的程序名
    fn program(&self) -> String;
}

/// 基于 duct 的真实执行器
#[derive(Debug, Clone)]
pub struct PipExecutor {
    program: PathBuf,
    prefix: Vec<String>,
    display_name: String,
}

impl PipExecutor {
    pub fn new(pm: &PackageManager) -> Self {
        let (program, prefix) = pm.program();
        Self {
            program,
            prefix,
            display_name: pm.name(),
        }
    }
}

impl Executor for PipExecutor {
    fn run(&self, args: &[String], mode: OutputMode) -> Result<CommandOutcome> {
        let full_args: Vec<String> = self.prefix.iter().chain(args.iter()).cloned().collect();
        log::debug!("running {} {}", self.program.display(), full_args.join(" "));

        let mut expression = duct::cmd(self.program.as_os_str(), full_args).unchecked();
        if mode == OutputMode::Silent {
            expression = expression.stdout_null().stderr_null();
        }

        let output = expression.run().map_err(|source| PeakError::Spawn {
            program: self.display_name.clone(),
            source,
        })?;
        Ok(CommandOutcome::from_status(output.status))
    }

    fn program(&self) -> String {
        self.display_name.clone()
    }
}
