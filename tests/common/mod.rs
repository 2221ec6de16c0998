#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 隔离的 HOME 和 PATH，PATH 中只有假的 python3 / pip3
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub bin: PathBuf,
    pub log: PathBuf,
    pub config: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let bin = tmp.path().join("bin");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&bin).expect("create bin dir");

        let log = tmp.path().join("pip.log");
        let config = tmp.path().join("config.toml");

        Self {
            _tmp: tmp,
            home,
            bin,
            log,
            config,
        }
    }

    /// 带假 python3 / pip3 的环境
    pub fn with_fake_pip() -> Self {
        let env = Self::new();
        // 每次调用把参数追加到日志；最后一个参数为 broken 或 missing 时失败
        let script = format!(
            "#!/bin/sh\n\
             echo \"${{0##*/}} $*\" >> '{}'\n\
             for last in \"$@\"; do :; done\n\
             case \"$last\" in\n  broken|missing) exit 1 ;;\nesac\n\
             exit 0\n",
            env.log.display()
        );
        write_executable(&env.bin.join("pip3"), &script);
        write_executable(&env.bin.join("python3"), &script);
        env
    }

    pub fn write_config(&self, content: &str) {
        fs::write(&self.config, content).expect("write config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("peakpip");
        cmd.env("HOME", &self.home)
            .env("PATH", &self.bin)
            .env("PEAKPIP_CONFIG", &self.config)
            .env("PEAKPIP_INDEX_URL", "http://127.0.0.1:9/pypi")
            .env("PEAKPIP_SIMPLE_URL", "http://127.0.0.1:9/simple")
            .env_remove("RUST_LOG");
        cmd
    }

    /// 假 pip 收到的调用，每行一次
    pub fn pip_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).expect("write script");
    let mut perms = fs::metadata(path).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod script");
}
