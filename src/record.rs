use chrono::{DateTime, Utc};

/// 从索引解码出的包元数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub summary: String,
    pub author: String,
    pub homepage: String,
    pub license: String,
    pub requires_python: Option<String>,
    /// 当前版本第一个发布文件的上传时间
    pub released: Option<DateTime<Utc>>,
    pub dependencies: Vec<String>,
    pub classifiers: Vec<String>,
}

impl PackageRecord {
    /// `show` 的多行输出
    pub fn render_details(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("name: {}\n", self.name));
        out.push_str(&format!("version: {}\n", self.version));
        out.push_str(&format!("summary: {}\n", self.summary));
        out.push_str(&format!("author: {}\n", self.author));
        out.push_str(&format!("homepage: {}\n", self.homepage));
        out.push_str(&format!("license: {}\n", self.license));
        if let Some(requires_python) = &self.requires_python {
            out.push_str(&format!("requires-python: {}\n", requires_python));
        }
        if let Some(released) = &self.released {
            out.push_str(&format!("released: {}\n", released.format("%Y-%m-%d")));
        }
        if !self.dependencies.is_empty() {
            out.push_str("dependencies:\n");
            for dep in &self.dependencies {
                out.push_str(&format!("  {}\n", dep));
            }
        }
        if !self.classifiers.is_empty() {
            out.push_str("classifiers:\n");
            for classifier in &self.classifiers {
                out.push_str(&format!("  {}\n", classifier));
            }
        }
        out
    }

    /// `search` 的单行输出
    pub fn render_summary_line(&self) -> String {
        format!("{} ({}) - {}", self.name, self.version, self.summary)
    }
}
