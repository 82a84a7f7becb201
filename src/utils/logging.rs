//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use std::collections::BTreeMap;
use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 名字来源抓取");
    info!("📊 最大并发查询数: {}", config.max_concurrent_lookups);
    info!("⏱️ 单次请求超时: {}秒", config.request_timeout_secs);
    info!("📁 原始响应目录: {}", config.raw_dir);
    info!("📄 结果表: {}{}", config.table_path, if config.resume { " (续跑)" } else { "" });
    info!("{}", "=".repeat(60));
}

/// 记录数据集加载信息
///
/// # 参数
/// - `rows`: 数据行数
/// - `unique`: 不重复名字数
/// - `by_sex`: 各性别的不重复名字数
pub fn log_dataset_loaded(rows: usize, unique: usize, by_sex: &BTreeMap<String, usize>) {
    info!("✓ 数据集共 {} 行, {} 个不重复名字", rows, unique);
    for (sex, count) in by_sex {
        info!("   不重复名字 ({}): {}", sex, count);
    }
}

/// 记录一轮查询开始
pub fn log_pass_start(pass: usize, total: usize, batch_size: usize) {
    info!("\n{}", "=".repeat(60));
    if pass == 1 {
        info!("📦 第 {} 轮: 查询 {} 个名字 (每批 {} 个)", pass, total, batch_size);
    } else {
        info!("🔁 第 {} 轮 (重试): 查询 {} 个名字 (每批 {} 个)", pass, total, batch_size);
    }
    info!("{}", "=".repeat(60));
}

/// 记录一轮查询完成
///
/// # 参数
/// - `pass`: 第几轮
/// - `classified`: 本轮写入结果表的数量
/// - `not_found`: 本轮未找到的数量
/// - `failed`: 本轮失败的数量
pub fn log_pass_complete(pass: usize, classified: usize, not_found: usize, failed: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 轮完成: 分类 {} | 未找到 {} | 失败 {}",
        pass, classified, not_found, failed
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `processed`: 本次查询的名字数
/// - `biblical`: 结果表中 biblical 名字数
/// - `classified`: 结果表中已分类名字数
/// - `not_found`: 未找到的名字数
/// - `unresolved`: 重试后仍失败的名字数
/// - `table_path`: 结果表路径
pub fn print_final_stats(
    processed: usize,
    biblical: usize,
    classified: usize,
    not_found: usize,
    unresolved: usize,
    table_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔎 处理名字: {}", processed);
    info!("✅ 已分类: {}", classified);
    info!("📖 Biblical: {}", biblical);
    info!("➖ 未找到: {}", not_found);
    info!("❌ 未解决: {}", unresolved);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", table_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
