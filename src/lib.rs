//! # Name Origin Scrape
//!
//! 读取名字数据集，逐个查询名字来源服务，判断名字是否为 biblical，
//! 保存原始响应和汇总的分类结果表。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只负责"把请求发出去，拿回响应体"
//! - `OriginLookup` - 查询能力的 trait，测试中可替换
//! - `OriginClient` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个名字
//! - `response_parser` - XML 解析与分类
//! - `ResultStore` - 原始响应 + 结果表
//! - `UnresolvedWriter` - 写 unresolved_names.txt
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个名字"的处理流程（查询 → 解析）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/retry_coordinator` - 两轮查询、批量并发、顺序提交
//! - `orchestrator/pipeline` - 数据集加载和整体生命周期
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{OriginClient, OriginLookup};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ClassificationRecord, LookupResult, LookupStatus};
pub use orchestrator::{App, RetryCoordinator, RunReport, RunSummary, ScrapeOutcome};
pub use workflow::{NameCtx, NameFlow};
