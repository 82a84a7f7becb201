use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 服务端"没有这个名字"的错误码
pub const NOT_FOUND_CODE: i64 = 50;

/// 单次查询的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    /// 查询成功，分类可信
    Success,
    /// 服务端没有数据，不再重试
    NotFound,
    /// 可重试的失败
    TransientFailure,
}

/// 失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 服务端返回错误码 50
    NotFound,
    /// 服务端返回的其它错误码
    ServiceError,
    /// 响应体无法解析
    MalformedResponse,
    /// 请求没有完成（连接失败、超时、非 2xx）
    NetworkFailure,
    /// 查询任务异常退出
    TaskAborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::NotFound => "not_found",
            FailureKind::ServiceError => "service_error",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::NetworkFailure => "network_failure",
            FailureKind::TaskAborted => "task_aborted",
        };
        f.write_str(label)
    }
}

/// 一个名字的一次查询结果
///
/// `is_biblical` 只有在 `status == Success` 时才有意义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub name: String,
    pub status: LookupStatus,
    pub is_biblical: bool,
    pub failure: Option<FailureKind>,
    /// 服务端错误码（仅当服务端返回了错误块）
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

impl LookupResult {
    pub fn success(name: impl Into<String>, is_biblical: bool) -> Self {
        Self {
            name: name.into(),
            status: LookupStatus::Success,
            is_biblical,
            failure: None,
            error_code: None,
            error_message: None,
        }
    }

    /// 根据服务端错误码分类：50 为 NotFound，其它为可重试失败
    pub fn service_error(name: impl Into<String>, code: i64, message: Option<String>) -> Self {
        let (status, failure) = if code == NOT_FOUND_CODE {
            (LookupStatus::NotFound, FailureKind::NotFound)
        } else {
            (LookupStatus::TransientFailure, FailureKind::ServiceError)
        };
        Self {
            name: name.into(),
            status,
            is_biblical: false,
            failure: Some(failure),
            error_code: Some(code),
            error_message: message,
        }
    }

    /// 非服务端报告的失败，一律按可重试处理
    pub fn transient(name: impl Into<String>, failure: FailureKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: LookupStatus::TransientFailure,
            is_biblical: false,
            failure: Some(failure),
            error_code: None,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == LookupStatus::Success
    }

    /// 只有成功状态下的 biblical 标记才可信
    pub fn biblical(&self) -> bool {
        self.is_success() && self.is_biblical
    }
}

/// 分类结果表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub name: String,
    #[serde(serialize_with = "serialize_flag", deserialize_with = "deserialize_flag")]
    pub is_biblical: bool,
}

impl ClassificationRecord {
    pub fn new(name: impl Into<String>, is_biblical: bool) -> Self {
        Self {
            name: name.into(),
            is_biblical,
        }
    }
}

// 结果表沿用 True/False 的写法；读取时兼容 1/0 和小写
fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "True" } else { "False" })
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!("无法识别的 is_biblical 值: {}", other))),
    }
}
