//! PackageManager 相关数据类型定义

/// pip 子进程的输出去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// 直接继承终端的 stdout / stderr
    Inherit,
    /// 丢弃输出，只关心退出状态
    Silent,
}

/// 命令执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// 被信号终止时为 None
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}
