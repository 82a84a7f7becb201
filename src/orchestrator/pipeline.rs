//! 抓取流水线 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源的创建和整体流程。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建查询客户端
//! 2. **数据加载**：读取名字数据集，去重并统计
//! 3. **抓取开关**：`scrape_enabled` 为 false 时只做数据统计
//! 4. **资源管理**：打开结果存储、未解决记录，交给重试协调器
//! 5. **全局统计**：汇总结果表并输出

use crate::clients::{OriginClient, OriginLookup};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_name_records, unique_names, unique_names_by_sex};
use crate::orchestrator::retry_coordinator::{RetryCoordinator, RunReport};
use crate::orchestrator::run_summary::{summarize, RunSummary};
use crate::services::{read_classifications, ResultStore, UnresolvedWriter};
use crate::utils::logging::{log_dataset_loaded, log_startup, print_final_stats};
use crate::workflow::NameFlow;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 一次抓取的最终结果
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub report: RunReport,
    pub summary: RunSummary,
}

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<dyn OriginLookup>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        log_startup(&config);

        if config.scrape_enabled && config.api_key.is_empty() {
            warn!("⚠️ 未设置 BTN_API_KEY，查询很可能全部失败");
        }

        let client = OriginClient::new(&config)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// 使用自定义查询实现创建（测试用）
    pub fn with_client(config: Config, client: Arc<dyn OriginLookup>) -> Self {
        Self { config, client }
    }

    /// 运行应用主逻辑
    ///
    /// 抓取被关闭时返回 `None`。
    pub async fn run(&self) -> Result<Option<ScrapeOutcome>> {
        let names = self.load_names().await?;

        if !self.config.scrape_enabled {
            info!("抓取已关闭 (SCRAPE_ENABLED=false)，程序结束");
            return Ok(None);
        }

        if names.is_empty() {
            warn!("⚠️ 数据集中没有名字，程序结束");
            return Ok(None);
        }

        self.scrape(names).await.map(Some)
    }

    /// 加载数据集并返回去重后的名字
    async fn load_names(&self) -> Result<Vec<String>> {
        info!("\n📁 正在加载数据集: {}", self.config.dataset_path);
        let records = load_name_records(Path::new(&self.config.dataset_path)).await?;
        let names = unique_names(&records);
        log_dataset_loaded(records.len(), names.len(), &unique_names_by_sex(&records));
        Ok(names)
    }

    /// 对给定名字执行两轮查询并汇总
    pub async fn scrape(&self, names: Vec<String>) -> Result<ScrapeOutcome> {
        let table_path = Path::new(&self.config.table_path);

        // 续跑时先读已有结果，再以追加方式打开
        let existing: HashSet<String> = if self.config.resume {
            read_classifications(table_path)
                .context("无法读取已有结果表")?
                .into_iter()
                .map(|r| r.name)
                .collect()
        } else {
            HashSet::new()
        };

        let store = ResultStore::open(&self.config.raw_dir, table_path, self.config.resume)
            .context("无法打开结果存储")?;

        let unresolved_writer = UnresolvedWriter::with_path(&self.config.unresolved_path);
        unresolved_writer.init()?;

        let flow = NameFlow::new(self.client.clone(), self.config.verbose_logging);
        let report = RetryCoordinator::new(
            flow,
            store,
            unresolved_writer,
            self.config.max_concurrent_lookups,
        )
        .with_existing(existing)
        .run(names)
        .await?;

        let summary = summarize(table_path).context("无法汇总结果表")?;

        info!("📖 Biblical 名字: {:?}", summary.biblical_names);
        print_final_stats(
            report.processed,
            summary.biblical_count,
            summary.total_classified,
            report.not_found.len(),
            report.unresolved.len(),
            &self.config.table_path,
        );

        Ok(ScrapeOutcome { report, summary })
    }
}
