//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整体流程调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `pipeline` - 抓取流水线
//! - 管理应用生命周期（初始化、运行）
//! - 加载数据集并去重
//! - 创建结果存储并交给重试协调器
//!
//! ### `retry_coordinator` - 重试协调器
//! - 两轮查询：首轮 + 仅一次的重试轮
//! - 控制并发批次，按输入顺序提交结果
//! - 唯一的结果写入者
//!
//! ### `run_summary` - 运行汇总
//! - 读取结果表，统计 biblical 名字
//!
//! ## 层次关系
//!
//! ```text
//! pipeline (处理整个数据集)
//!     ↓
//! retry_coordinator (处理 Vec<Name>，两轮)
//!     ↓
//! workflow::NameFlow (处理单个 Name)
//!     ↓
//! clients (查询) / services (解析、存储)
//! ```

pub mod pipeline;
pub mod retry_coordinator;
pub mod run_summary;

// 重新导出主要类型
pub use pipeline::{App, ScrapeOutcome};
pub use retry_coordinator::{RetryCoordinator, RunReport};
pub use run_summary::{summarize, RunSummary};
