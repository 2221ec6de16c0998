//! 命令分发：把解析后的动作映射为 pip 调用或索引查询

use crate::config::OperationConfig;
use crate::error::{PeakError, Result};
use crate::index::IndexClient;
use crate::package_manager::{args, Executor, OutputMode};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 一次命令调用要执行的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Install {
        names: Vec<String>,
        requirements: Option<PathBuf>,
    },
    Uninstall {
        names: Vec<String>,
    },
    List {
        outdated: bool,
    },
    Show {
        names: Vec<String>,
    },
    Search {
        query: Vec<String>,
    },
    Upgrade {
        names: Vec<String>,
    },
    Download {
        names: Vec<String>,
        dest: Option<PathBuf>,
    },
    Freeze,
    Check {
        names: Vec<String>,
    },
}

fn require_names(verb: &str, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(PeakError::Usage(format!(
            "{} requires at least 1 package name",
            verb
        )));
    }
    Ok(())
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Install { .. } => "install",
            Action::Uninstall { .. } => "uninstall",
            Action::List { .. } => "list",
            Action::Show { .. } => "show",
            Action::Search { .. } => "search",
            Action::Upgrade { .. } => "upgrade",
            Action::Download { .. } => "download",
            Action::Freeze => "freeze",
            Action::Check { .. } => "check",
        }
    }

    /// 参数个数检查，在任何子进程或网络请求之前执行
    pub fn validate(&self) -> Result<()> {
        match self {
            Action::Install {
                names,
                requirements: None,
            } => require_names(self.verb(), names),
            Action::Uninstall { names }
            | Action::Show { names }
            | Action::Upgrade { names }
            | Action::Download { names, .. }
            | Action::Check { names } => require_names(self.verb(), names),
            Action::Search { query } if query.len() != 1 => Err(PeakError::Usage(format!(
                "search accepts exactly 1 query, received {}",
                query.len()
            ))),
            _ => Ok(()),
        }
    }
}

/// 以最多 `limit` 个并发任务处理每个名字，结果按输入顺序返回
async fn fan_out<T, F, Fut>(names: &[String], limit: usize, mut task: F) -> Vec<Result<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    // tokio 的信号量有上限，超过任务数的许可也没有意义
    let permits = limit.min(names.len()).clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let semaphore = semaphore.clone();
            let fut = task(name.clone());
            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PeakError::Task(e.to_string()))?;
                fut.await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(PeakError::Task(e.to_string())),
        });
    }
    results
}

pub struct Dispatcher {
    config: OperationConfig,
    executor: Arc<dyn Executor>,
    index: IndexClient,
}

impl Dispatcher {
    pub fn new(config: OperationConfig, executor: Arc<dyn Executor>, index: IndexClient) -> Self {
        Self {
            config,
            executor,
            index,
        }
    }

    pub async fn dispatch(&self, action: Action, out: &mut dyn Write) -> Result<()> {
        action.validate()?;
        log::debug!("dispatching {}", action.verb());

        match action {
            Action::Install {
                names,
                requirements,
            } => {
                if let Some(file) = requirements {
                    let description = format!("install requirements from: {}", file.display());
                    self.run_pip(out, &description, args::requirements_args(&self.config, &file))
                        .map_err(|e| {
                            PeakError::failed("install requirements from", file.display().to_string(), e)
                        })?;
                }
                self.for_each_name(out, "install", &names, |name| {
                    args::install_args(&self.config, name)
                })
            }
            Action::Uninstall { names } => self.for_each_name(out, "uninstall", &names, |name| {
                args::uninstall_args(&self.config, name)
            }),
            Action::Upgrade { names } => self.for_each_name(out, "upgrade", &names, |name| {
                args::upgrade_args(&self.config, name)
            }),
            Action::Download { names, dest } => {
                self.log_sequential("download", &names);
                for name in &names {
                    let description = match &dest {
                        Some(dir) => format!("download: {} to {}", name, dir.display()),
                        None => format!("download: {}", name),
                    };
                    let pip_args = args::download_args(&self.config, name, dest.as_deref());
                    self.run_pip(out, &description, pip_args)
                        .map_err(|e| PeakError::failed("download", name.as_str(), e))?;
                }
                Ok(())
            }
            Action::List { outdated } => {
                self.run_pip(out, "list packages", args::list_args(&self.config, outdated))
            }
            Action::Freeze => self.run_pip(out, "freeze packages", args::freeze_args()),
            Action::Show { names } => self.show(out, &names).await,
            Action::Search { query } => self.search(out, &query[0]).await,
            Action::Check { names } => self.check(out, &names).await,
        }
    }

    /// 运行一次 pip；dry-run 时只输出将要执行的动作
    fn run_pip(&self, out: &mut dyn Write, description: &str, pip_args: Vec<String>) -> Result<()> {
        if self.config.dry_run {
            writeln!(out, "would {}", description)?;
            return Ok(());
        }
        log::info!("pip {}", pip_args.join(" "));
        let outcome = self.executor.run(&pip_args, OutputMode::Inherit)?;
        if !outcome.success {
            return Err(PeakError::Subprocess {
                program: self.executor.program(),
                code: outcome.code,
            });
        }
        Ok(())
    }

    /// 依次处理每个包，第一个失败即中止
    fn for_each_name<F>(
        &self,
        out: &mut dyn Write,
        verb: &'static str,
        names: &[String],
        build: F,
    ) -> Result<()>
    where
        F: Fn(&str) -> Vec<String>,
    {
        self.log_sequential(verb, names);
        for name in names {
            let description = format!("{}: {}", verb, name);
            self.run_pip(out, &description, build(name))
                .map_err(|e| PeakError::failed(verb, name.as_str(), e))?;
        }
        Ok(())
    }

    // 并发运行 pip 会争抢同一个 site-packages
    fn log_sequential(&self, verb: &str, names: &[String]) {
        if names.len() > 1 && self.config.concurrent > 1 {
            log::debug!(
                "{}: --concurrent {} ignored, pip runs one package at a time",
                verb,
                self.config.concurrent
            );
        }
    }

    async fn show(&self, out: &mut dyn Write, names: &[String]) -> Result<()> {
        let results = fan_out(names, self.config.concurrent, |name| {
            let index = self.index.clone();
            async move { index.fetch_record(&name).await }
        })
        .await;

        for (i, (name, result)) in names.iter().zip(results).enumerate() {
            let record = result.map_err(|e| PeakError::failed("show", name.as_str(), e))?;
            if i > 0 {
                writeln!(out, "---")?;
            }
            write!(out, "{}", record.render_details())?;
        }
        Ok(())
    }

    async fn search(&self, out: &mut dyn Write, query: &str) -> Result<()> {
        let results = self.index.search(query).await?;
        if results.is_empty() {
            writeln!(out, "no package named {} found", query)?;
        }
        for record in &results {
            writeln!(out, "{}", record.render_summary_line())?;
        }
        Ok(())
    }

    async fn check(&self, out: &mut dyn Write, names: &[String]) -> Result<()> {
        if self.config.dry_run {
            for name in names {
                writeln!(out, "would check: {}", name)?;
            }
            return Ok(());
        }

        let results = fan_out(names, self.config.concurrent, |name| {
            let executor = self.executor.clone();
            let pip_args = args::check_args(&name);
            async move {
                tokio::task::spawn_blocking(move || executor.run(&pip_args, OutputMode::Silent))
                    .await
                    .map_err(|e| PeakError::Task(e.to_string()))?
            }
        })
        .await;

        for (name, result) in names.iter().zip(results) {
            let outcome = result.map_err(|e| PeakError::failed("check", name.as_str(), e))?;
            let status = if outcome.success {
                "installed"
            } else {
                "not installed"
            };
            writeln!(out, "{}: {}", name, status)?;
        }
        Ok(())
    }
}
