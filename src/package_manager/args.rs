//! pip 参数构造
//!
//! 顺序固定：pip 子命令，行为参数，目标/目的目录，最后是包名或需求文件。

use crate::config::OperationConfig;
use std::path::Path;

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// --user / --target，仅安装类命令使用
fn install_location_args(config: &OperationConfig, with_target: bool) -> Vec<String> {
    let mut args = Vec::new();
    if config.user_install {
        args.push("--user".to_string());
    }
    if with_target {
        if let Some(target) = &config.target {
            args.push("--target".to_string());
            args.push(path_arg(target));
        }
    }
    args
}

pub fn install_args(config: &OperationConfig, spec: &str) -> Vec<String> {
    let mut args = vec!["install".to_string()];
    args.extend(config.verbosity_args());
    args.extend(install_location_args(config, true));
    args.push(spec.to_string());
    args
}

pub fn requirements_args(config: &OperationConfig, file: &Path) -> Vec<String> {
    let mut args = vec!["install".to_string()];
    args.extend(config.verbosity_args());
    args.extend(install_location_args(config, true));
    args.push("-r".to_string());
    args.push(path_arg(file));
    args
}

pub fn uninstall_args(config: &OperationConfig, name: &str) -> Vec<String> {
    let mut args = vec!["uninstall".to_string(), "-y".to_string()];
    args.extend(config.verbosity_args());
    args.push(name.to_string());
    args
}

pub fn list_args(config: &OperationConfig, outdated: bool) -> Vec<String> {
    let mut args = vec!["list".to_string()];
    if outdated {
        args.push("--outdated".to_string());
    }
    args.extend(config.verbosity_args());
    args
}

pub fn upgrade_args(config: &OperationConfig, name: &str) -> Vec<String> {
    let mut args = vec!["install".to_string(), "--upgrade".to_string()];
    args.extend(config.verbosity_args());
    args.extend(install_location_args(config, false));
    args.push(name.to_string());
    args
}

pub fn download_args(config: &OperationConfig, name: &str, dest: Option<&Path>) -> Vec<String> {
    let mut args = vec!["download".to_string()];
    args.extend(config.verbosity_args());
    if let Some(dest) = dest {
        args.push("--dest".to_string());
        args.push(path_arg(dest));
    }
    args.push(name.to_string());
    args
}

pub fn freeze_args() -> Vec<String> {
    vec!["freeze".to_string()]
}

/// `pip show` 只用来探测是否已安装
pub fn check_args(name: &str) -> Vec<String> {
    vec!["show".to_string(), name.to_string()]
}
