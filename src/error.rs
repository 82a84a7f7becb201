use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 查询接口错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 名字来源查询的传输层错误
///
/// 只描述"请求没有拿到响应体"的情况；服务端在响应体里返回的错误码由
/// 响应解析器处理，不在这里。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接失败、DNS、读取响应体失败等）
    #[error("API请求失败 ({name}): {source}")]
    RequestFailed {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    /// 请求超时
    #[error("API请求超时 ({name}), 超时设置: {timeout_secs}秒")]
    Timeout { name: String, timeout_secs: u64 },
    /// 非 2xx 状态码
    #[error("API返回错误状态 ({name}): HTTP {status}")]
    BadStatus { name: String, status: u16 },
    /// 构建 HTTP 客户端失败
    #[error("无法创建HTTP客户端: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// 响应解析错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// 响应体为空
    #[error("响应体为空")]
    Empty,
    /// XML 格式不正确
    #[error("XML格式错误: {0}")]
    MalformedXml(String),
    /// 缺少 <response> 根节点
    #[error("缺少 <response> 根节点")]
    MissingRoot,
    /// 错误码不是数字
    #[error("无法解析错误码: {0}")]
    InvalidErrorCode(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 读写失败
    #[error("CSV处理失败 ({path}): {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// 名字无法映射为合法的文件名
    #[error("名字无法作为文件名: {name:?}")]
    InvalidRecordName { name: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl FileError {
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<String>, source: csv::Error) -> Self {
        FileError::Csv {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_display() {
        let err: AppError = ApiError::BadStatus {
            name: "Mary".to_string(),
            status: 503,
        }
        .into();
        assert_eq!(err.to_string(), "API错误: API返回错误状态 (Mary): HTTP 503");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "max_concurrent_lookups".to_string(),
            reason: "必须大于 0".to_string(),
        };
        assert!(err.to_string().contains("max_concurrent_lookups"));
    }
}
