use crate::config::Config;
use crate::error::{PeakError, Result};
use crate::record::PackageRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// 索引地址与超时
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEndpoints {
    pub index_url: String,
    pub simple_url: String,
    pub timeout: Duration,
}

impl IndexEndpoints {
    pub fn from_config(config: &Config) -> Self {
        Self {
            index_url: config.index_url.clone(),
            simple_url: config.simple_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
    #[serde(default)]
    urls: Vec<ReleaseFile>,
}

// PyPI 对缺失字段经常返回 null，全部按 Option 解码
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectInfo {
    name: Option<String>,
    version: Option<String>,
    summary: Option<String>,
    author: Option<String>,
    home_page: Option<String>,
    license: Option<String>,
    requires_python: Option<String>,
    requires_dist: Option<Vec<String>>,
    classifiers: Option<Vec<String>>,
    project_urls: Option<HashMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReleaseFile {
    upload_time_iso_8601: Option<String>,
    upload_time: Option<String>,
}

impl ReleaseFile {
    fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        if let Some(ts) = &self.upload_time_iso_8601 {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
                return Some(parsed.with_timezone(&Utc));
            }
        }
        let ts = self.upload_time.as_deref()?;
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl ProjectResponse {
    fn into_record(self, requested: &str) -> PackageRecord {
        let released = self.urls.iter().find_map(ReleaseFile::uploaded_at);
        let info = self.info;

        // home_page 为空时退回 project_urls 中的主页
        let homepage = non_empty(info.home_page).or_else(|| {
            let urls = info.project_urls.as_ref()?;
            ["Homepage", "Home", "homepage"]
                .iter()
                .find_map(|key| urls.get(*key).cloned())
        });

        PackageRecord {
            name: non_empty(info.name).unwrap_or_else(|| requested.to_string()),
            version: info.version.unwrap_or_default(),
            summary: info.summary.unwrap_or_default(),
            author: info.author.unwrap_or_default(),
            homepage: homepage.unwrap_or_default(),
            license: info.license.unwrap_or_default(),
            requires_python: non_empty(info.requires_python),
            released,
            dependencies: info.requires_dist.unwrap_or_default(),
            classifiers: info.classifiers.unwrap_or_default(),
        }
    }
}

/// 在 base 之后追加路径段，每段单独做百分号编码
fn package_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(base).map_err(|e| PeakError::Usage(format!("invalid index URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| PeakError::Usage(format!("invalid index URL {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn check_name(name: &str) -> Result<()> {
    if matches!(name.trim(), "" | "." | "..") {
        return Err(PeakError::Usage(format!("invalid package name: {:?}", name)));
    }
    Ok(())
}

/// PyPI JSON API 客户端
#[derive(Debug, Clone)]
pub struct IndexClient {
    client: Client,
    endpoints: IndexEndpoints,
}

impl IndexClient {
    pub fn new(endpoints: IndexEndpoints) -> Result<Self> {
        let client = Client::builder()
            .timeout(endpoints.timeout)
            .user_agent(concat!("peakpip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PeakError::Initialization(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &IndexEndpoints {
        &self.endpoints
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        log::debug!("GET {}", url);
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| PeakError::Network {
                url: url.to_string(),
                source,
            })
    }

    /// 获取 `<index>/<name>/json` 并解码
    pub async fn fetch_record(&self, name: &str) -> Result<PackageRecord> {
        check_name(name)?;
        let url = package_url(&self.endpoints.index_url, &[name, "json"])?;
        let response = self.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeakError::NotFound {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| PeakError::Network {
            url: url.to_string(),
            source,
        })?;
        let project: ProjectResponse =
            serde_json::from_str(&body).map_err(|source| PeakError::Decode {
                name: name.to_string(),
                source,
            })?;

        let record = project.into_record(name);
        log::info!("fetched {} {}", record.name, record.version);
        Ok(record)
    }

    /// 索引没有全文搜索，这里只是按名字做存在性检查，最多返回一条
    pub async fn search(&self, query: &str) -> Result<Vec<PackageRecord>> {
        check_name(query)?;
        // 末尾空段保留 simple 索引要求的结尾斜杠
        let url = package_url(&self.endpoints.simple_url, &[query, ""])?;
        let response = self.get(&url).await?;
        if !response.status().is_success() {
            log::info!("{} not on the index (status {})", query, response.status());
            return Ok(Vec::new());
        }
        Ok(vec![self.fetch_record(query).await?])
    }
}
