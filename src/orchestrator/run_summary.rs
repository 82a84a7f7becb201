//! 运行汇总
//!
//! 只读结果表做聚合，不写任何东西。

use std::path::Path;

use crate::error::FileError;
use crate::models::ClassificationRecord;
use crate::services::read_classifications;

/// 结果表汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub biblical_count: usize,
    /// 按表中顺序
    pub biblical_names: Vec<String>,
    pub total_classified: usize,
}

impl RunSummary {
    pub fn from_records(records: &[ClassificationRecord]) -> Self {
        let biblical_names: Vec<String> = records
            .iter()
            .filter(|r| r.is_biblical)
            .map(|r| r.name.clone())
            .collect();

        Self {
            biblical_count: biblical_names.len(),
            biblical_names,
            total_classified: records.len(),
        }
    }
}

/// 汇总结果表
pub fn summarize(table_path: &Path) -> Result<RunSummary, FileError> {
    let records = read_classifications(table_path)?;
    Ok(RunSummary::from_records(&records))
}
