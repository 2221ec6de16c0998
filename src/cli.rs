use crate::config::{Config, OperationConfig};
use crate::dispatch::Action;
use crate::error::{PeakError, Result};
use crate::index::IndexEndpoints;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "peakpip",
    version,
    about = "peakpip - peaker pip trust",
    long_about = "peakpip is a faster (?) version of pip (it's a wrapper)"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Give less output")]
    pub quiet: bool,
    #[arg(short, long, global = true, help = "Give more output")]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        help = "Don't actually change anything, just print what would be done"
    )]
    pub dry_run: bool,
    #[arg(
        long,
        global = true,
        value_name = "N",
        help = "Maximum number of concurrent lookups for show/check [default: 10]"
    )]
    pub concurrent: Option<usize>,
    #[arg(
        long,
        global = true,
        env = "PEAKPIP_INDEX_URL",
        value_name = "URL",
        help = "Package index JSON API base URL"
    )]
    pub index_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = "PEAKPIP_SIMPLE_URL",
        value_name = "URL",
        help = "Package index simple API base URL"
    )]
    pub simple_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install packages
    Install {
        packages: Vec<String>,
        #[arg(short = 'U', long, help = "Install to user directory")]
        user: bool,
        #[arg(short, long, value_name = "DIR", help = "Install packages into target directory")]
        target: Option<PathBuf>,
        #[arg(short, long, value_name = "FILE", help = "Install from requirements file")]
        requirements: Option<PathBuf>,
    },
    /// Uninstall packages
    Uninstall { packages: Vec<String> },
    /// List installed packages
    List {
        #[arg(long, help = "List outdated packages")]
        outdated: bool,
    },
    /// Show information about packages
    Show { packages: Vec<String> },
    /// Search for packages
    Search { query: Vec<String> },
    /// Upgrade packages
    Upgrade {
        packages: Vec<String>,
        #[arg(short = 'U', long, help = "Install to user directory")]
        user: bool,
    },
    /// Download packages
    Download {
        packages: Vec<String>,
        #[arg(short, long, value_name = "DIR", help = "Download directory")]
        dest: Option<PathBuf>,
    },
    /// Output installed packages in requirements format
    Freeze,
    /// Check if packages are installed
    Check { packages: Vec<String> },
}

/// 解析后的完整调用：行为选项、动作、索引地址
#[derive(Debug)]
pub struct Invocation {
    pub operation: OperationConfig,
    pub action: Action,
    pub endpoints: IndexEndpoints,
}

impl Cli {
    /// 合并配置文件默认值，构造只读的 OperationConfig
    pub fn resolve(self, file: &Config) -> Result<Invocation> {
        let concurrent = self.concurrent.unwrap_or(file.concurrent);
        if concurrent == 0 {
            return Err(PeakError::Usage(
                "--concurrent must be at least 1".to_string(),
            ));
        }

        let mut endpoints = IndexEndpoints::from_config(file);
        if let Some(url) = self.index_url {
            endpoints.index_url = url;
        }
        if let Some(url) = self.simple_url {
            endpoints.simple_url = url;
        }

        let mut operation = OperationConfig {
            quiet: self.quiet,
            verbose: self.verbose,
            dry_run: self.dry_run,
            user_install: false,
            target: None,
            concurrent,
        };

        let action = match self.command {
            Commands::Install {
                packages,
                user,
                target,
                requirements,
            } => {
                operation.user_install = user;
                operation.target = target;
                Action::Install {
                    names: packages,
                    requirements,
                }
            }
            Commands::Uninstall { packages } => Action::Uninstall { names: packages },
            Commands::List { outdated } => Action::List { outdated },
            Commands::Show { packages } => Action::Show { names: packages },
            Commands::Search { query } => Action::Search { query },
            Commands::Upgrade { packages, user } => {
                operation.user_install = user;
                Action::Upgrade { names: packages }
            }
            Commands::Download { packages, dest } => Action::Download {
                names: packages,
                dest,
            },
            Commands::Freeze => Action::Freeze,
            Commands::Check { packages } => Action::Check { names: packages },
        };

        Ok(Invocation {
            operation,
            action,
            endpoints,
        })
    }
}
