//! 名字处理上下文
//!
//! 封装"我正在处理第几轮的第几个名字"这一信息

use std::fmt::Display;

/// 名字处理上下文
#[derive(Debug, Clone)]
pub struct NameCtx {
    /// 名字本身
    pub name: String,

    /// 第几轮（1 为首轮，2 为重试轮）
    pub pass: usize,

    /// 本轮中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本轮名字总数
    pub total: usize,
}

impl NameCtx {
    pub fn new(name: String, pass: usize, index: usize, total: usize) -> Self {
        Self {
            name,
            pass,
            index,
            total,
        }
    }
}

impl Display for NameCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[第{}轮 {}/{} {}]",
            self.pass, self.index, self.total, self.name
        )
    }
}
