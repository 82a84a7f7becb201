use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "NAME_ORIGIN_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 名字数据集 CSV 路径
    pub dataset_path: String,
    /// 是否执行抓取阶段
    pub scrape_enabled: bool,
    // --- 名字来源查询接口 ---
    pub lookup_base_url: String,
    pub api_key: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 同时进行的查询数量
    pub max_concurrent_lookups: usize,
    // --- 输出 ---
    /// 原始 XML 响应存放目录
    pub raw_dir: String,
    /// 分类结果表
    pub table_path: String,
    /// 重试后仍失败的名字记录
    pub unresolved_path: String,
    /// 保留已有结果表，跳过已分类的名字
    pub resume: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: "baby-names.csv".to_string(),
            scrape_enabled: true,
            lookup_base_url: "https://www.behindthename.com/api/lookup.php".to_string(),
            api_key: String::new(),
            request_timeout_secs: 30,
            max_concurrent_lookups: 4,
            raw_dir: "btn_data".to_string(),
            table_path: "biblical_names.csv".to_string(),
            unresolved_path: "unresolved_names.txt".to_string(),
            resume: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只从环境变量读取，缺失或无法解析的值使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取配置：可选的 TOML 文件 + 环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?.with_env_overrides(),
            Err(_) => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
            field: CONFIG_PATH_ENV.to_string(),
            reason: format!("无法读取 {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })
    }

    fn with_env_overrides(self) -> Self {
        Self {
            dataset_path: std::env::var("DATASET_PATH").unwrap_or(self.dataset_path),
            scrape_enabled: std::env::var("SCRAPE_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(self.scrape_enabled),
            lookup_base_url: std::env::var("LOOKUP_BASE_URL").unwrap_or(self.lookup_base_url),
            api_key: std::env::var("BTN_API_KEY").unwrap_or(self.api_key),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            max_concurrent_lookups: std::env::var("MAX_CONCURRENT_LOOKUPS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_lookups),
            raw_dir: std::env::var("RAW_DIR").unwrap_or(self.raw_dir),
            table_path: std::env::var("TABLE_PATH").unwrap_or(self.table_path),
            unresolved_path: std::env::var("UNRESOLVED_PATH").unwrap_or(self.unresolved_path),
            resume: std::env::var("RESUME").ok().and_then(|v| v.parse().ok()).unwrap_or(self.resume),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_lookups == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_lookups".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_key = "abc123"
            max_concurrent_lookups = 1
            resume = true
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.max_concurrent_lookups, 1);
        assert!(config.resume);
        assert_eq!(config.table_path, "biblical_names.csv");
        assert_eq!(config.raw_dir, "btn_data");
        assert!(config.scrape_enabled);
    }

    #[test]
    fn test_toml_type_error() {
        let err = Config::from_toml_str("max_concurrent_lookups = \"many\"", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseFailed { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            max_concurrent_lookups: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}
