//! 重试协调器 - 编排层
//!
//! ## 职责
//!
//! 驱动所有名字的查询，并且是结果存储的唯一写入者。
//!
//! ## 状态
//!
//! ```text
//! Pending → Success | NotFound | TransientFailure
//!                                 ↓ (仅一次)
//!                              Pending → Success | NotFound | 未解决
//! ```
//!
//! ## 核心流程
//!
//! 1. **第 1 轮**：按首次出现顺序查询全部名字
//!    - Success：保存原始响应，追加结果行
//!    - NotFound：只记录，不写结果行，不重试
//!    - TransientFailure：放入重试集合，不写任何东西
//! 2. **第 2 轮**：重试集合只跑一次，逻辑相同
//! 3. 仍然失败的名字记为"未解决"，写入记录文件
//!
//! 每批名字并发查询（tokio::spawn），但结果按输入顺序提交，
//! 所以结果表的行序始终是第 1 轮顺序 + 第 2 轮顺序。

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{error, info, warn};

use crate::error::FileError;
use crate::models::{FailureKind, LookupResult, LookupStatus};
use crate::services::{ResultStore, UnresolvedWriter};
use crate::utils::logging::{log_pass_complete, log_pass_start};
use crate::workflow::{NameCtx, NameFlow, Resolution};

/// 一次运行的结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 本次实际查询的名字数
    pub processed: usize,
    /// 续跑时因已在结果表中而跳过的名字数
    pub skipped_existing: usize,
    /// 本次写入结果表的名字数
    pub classified: usize,
    /// 本次发现的 biblical 名字（按写入顺序）
    pub biblical_names: Vec<String>,
    /// 服务端没有数据的名字
    pub not_found: Vec<String>,
    /// 进入重试轮的名字数
    pub retried: usize,
    /// 重试后仍失败的名字
    pub unresolved: Vec<String>,
}

/// 单轮统计
#[derive(Debug, Default)]
struct PassStats {
    classified: usize,
    not_found: usize,
}

/// 重试协调器
pub struct RetryCoordinator {
    flow: NameFlow,
    store: ResultStore,
    unresolved_writer: UnresolvedWriter,
    batch_size: usize,
    existing: HashSet<String>,
}

impl RetryCoordinator {
    pub fn new(
        flow: NameFlow,
        store: ResultStore,
        unresolved_writer: UnresolvedWriter,
        batch_size: usize,
    ) -> Self {
        Self {
            flow,
            store,
            unresolved_writer,
            batch_size: batch_size.max(1),
            existing: HashSet::new(),
        }
    }

    /// 续跑：这些名字已经在结果表中，不再查询
    pub fn with_existing(mut self, existing: HashSet<String>) -> Self {
        self.existing = existing;
        self
    }

    /// 运行两轮查询
    pub async fn run(mut self, names: Vec<String>) -> Result<RunReport> {
        let mut report = RunReport::default();

        let mut seen = HashSet::new();
        let pending: Vec<String> = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .filter(|name| {
                let skip = self.existing.contains(name);
                if skip {
                    report.skipped_existing += 1;
                }
                !skip
            })
            .collect();

        if report.skipped_existing > 0 {
            info!("⏭️ 跳过 {} 个已分类的名字", report.skipped_existing);
        }
        report.processed = pending.len();

        // ========== 第 1 轮 ==========
        let retry_set = self.run_pass(1, &pending, &mut report).await?;
        report.retried = retry_set.len();

        if retry_set.is_empty() {
            return Ok(report);
        }

        // ========== 第 2 轮（只重试一次） ==========
        let retry_names: Vec<String> = retry_set.into_iter().map(|r| r.name).collect();
        let still_failing = self.run_pass(2, &retry_names, &mut report).await?;

        for result in still_failing {
            warn!(
                "❌ 放弃 {}: 重试后仍失败 ({} code={:?})",
                result.name,
                result.failure.map(|f| f.to_string()).unwrap_or_default(),
                result.error_code
            );
            self.unresolved_writer.write(2, &result).await?;
            report.unresolved.push(result.name);
        }

        if !report.unresolved.is_empty() {
            warn!(
                "⚠️ {} 个名字未解决，详见: {}",
                report.unresolved.len(),
                self.unresolved_writer.path()
            );
        }

        Ok(report)
    }

    /// 跑一轮，返回本轮仍为 TransientFailure 的结果（保持输入顺序）
    async fn run_pass(
        &mut self,
        pass: usize,
        names: &[String],
        report: &mut RunReport,
    ) -> Result<Vec<LookupResult>> {
        let total = names.len();
        log_pass_start(pass, total, self.batch_size);

        let mut stats = PassStats::default();
        let mut failures = Vec::new();

        for (batch_index, batch) in names.chunks(self.batch_size).enumerate() {
            let offset = batch_index * self.batch_size;
            let resolutions = self.resolve_batch(pass, batch, offset, total).await;

            for resolution in resolutions {
                if let Some(failed) = self.commit(resolution, report, &mut stats)? {
                    failures.push(failed);
                }
            }
        }

        log_pass_complete(pass, stats.classified, stats.not_found, failures.len());
        Ok(failures)
    }

    /// 并发查询一批名字，结果按输入顺序返回
    async fn resolve_batch(
        &self,
        pass: usize,
        batch: &[String],
        offset: usize,
        total: usize,
    ) -> Vec<Resolution> {
        let handles: Vec<_> = batch
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let flow = self.flow.clone();
                let ctx = NameCtx::new(name.clone(), pass, offset + i + 1, total);
                tokio::spawn(async move { flow.resolve(&ctx).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(batch)
            .map(|(joined, name)| match joined {
                Ok(resolution) => resolution,
                Err(e) => {
                    error!("[第{}轮 {}] 查询任务异常退出: {}", pass, name, e);
                    Resolution {
                        result: LookupResult::transient(name, FailureKind::TaskAborted, e.to_string()),
                        raw: None,
                    }
                }
            })
            .collect()
    }

    /// 提交一个名字的结果
    ///
    /// 存储本身的 I/O 错误向上传播（无法再保证持久化），
    /// 名字级别的失败只返回给调用方决定是否重试。
    fn commit(
        &mut self,
        resolution: Resolution,
        report: &mut RunReport,
        stats: &mut PassStats,
    ) -> Result<Option<LookupResult>> {
        let Resolution { result, raw } = resolution;

        match result.status {
            LookupStatus::Success => {
                if let Some(raw) = raw.as_deref() {
                    match self.store.store_raw(&result.name, raw) {
                        Ok(()) => {}
                        Err(FileError::InvalidRecordName { name }) => {
                            warn!("名字 {:?} 无法作为文件名，跳过原始响应保存", name);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                let is_biblical = result.biblical();
                self.store.append_classification(&result.name, is_biblical)?;

                stats.classified += 1;
                report.classified += 1;
                if is_biblical {
                    report.biblical_names.push(result.name);
                }
                Ok(None)
            }
            LookupStatus::NotFound => {
                stats.not_found += 1;
                report.not_found.push(result.name);
                Ok(None)
            }
            LookupStatus::TransientFailure => Ok(Some(result)),
        }
    }
}
