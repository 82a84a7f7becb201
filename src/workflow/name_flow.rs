//! 名字处理流程 - 流程层
//!
//! 核心职责：定义"一个名字"的查询流程
//!
//! 流程顺序：
//! 1. 查询来源服务
//! 2. 解析响应并分类
//!
//! 持久化不在这里做：结果交给编排层按顺序统一写入。

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::OriginLookup;
use crate::models::{FailureKind, LookupResult, LookupStatus};
use crate::services::response_parser;
use crate::utils::logging::truncate_text;
use crate::workflow::name_ctx::NameCtx;

/// 一个名字的处理结果
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: LookupResult,
    /// 原始响应，只在没有错误码且解析成功时保留
    pub raw: Option<String>,
}

/// 名字处理流程
///
/// - 不持有任何文件句柄
/// - 只依赖查询能力（clients）和解析能力（services）
/// - 任何失败都在这里转成 `LookupResult`，不向上传播
#[derive(Clone)]
pub struct NameFlow {
    client: Arc<dyn OriginLookup>,
    verbose_logging: bool,
}

impl NameFlow {
    pub fn new(client: Arc<dyn OriginLookup>, verbose_logging: bool) -> Self {
        Self {
            client,
            verbose_logging,
        }
    }

    pub async fn resolve(&self, ctx: &NameCtx) -> Resolution {
        let raw = match self.client.lookup(&ctx.name).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} ⚠️ 请求失败: {}", ctx, e);
                return Resolution {
                    result: LookupResult::transient(&ctx.name, FailureKind::NetworkFailure, e.to_string()),
                    raw: None,
                };
            }
        };

        if self.verbose_logging {
            debug!("{} 响应预览: {}", ctx, truncate_text(raw.trim(), 120));
        }

        let result = response_parser::parse(&ctx.name, &raw);
        self.log_result(ctx, &result);

        let raw = (result.status == LookupStatus::Success).then_some(raw);
        Resolution { result, raw }
    }

    fn log_result(&self, ctx: &NameCtx, result: &LookupResult) {
        match result.status {
            LookupStatus::Success => {
                if result.is_biblical {
                    info!("{} ✓ biblical", ctx);
                } else {
                    debug!("{} ✓ 非 biblical", ctx);
                }
            }
            LookupStatus::NotFound => {
                info!("{} 未找到来源信息，跳过", ctx);
            }
            LookupStatus::TransientFailure => {
                warn!(
                    "{} ❌ 失败: {} code={:?} {}",
                    ctx,
                    result.failure.map(|f| f.to_string()).unwrap_or_default(),
                    result.error_code,
                    result.error_message.as_deref().unwrap_or("")
                );
            }
        }
    }
}
