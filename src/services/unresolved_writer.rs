//! 未解决名字记录服务 - 业务能力层
//!
//! 只负责"写 unresolved_names.txt"能力，不关心流程

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::debug;

use crate::models::LookupResult;

/// 未解决名字记录服务
///
/// 职责：
/// - 重试后仍失败的名字追加写入记录文件
/// - 每次只写一个名字
pub struct UnresolvedWriter {
    file_path: String,
}

impl UnresolvedWriter {
    /// 使用给定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }

    /// 写入本次运行的文件头（覆盖旧内容）
    pub fn init(&self) -> Result<()> {
        let header = format!(
            "{}\n未解决名字记录 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        fs::write(&self.file_path, header)
            .with_context(|| format!("无法初始化记录文件: {}", self.file_path))?;
        Ok(())
    }

    /// 追加一个未解决的名字
    pub async fn write(&self, pass: usize, result: &LookupResult) -> Result<()> {
        debug!("写入未解决名字: {} | 第{}轮", result.name, pass);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .with_context(|| format!("无法打开记录文件: {}", self.file_path))?;

        let line = format!(
            "{} | 第{}轮 | {} | code={} | {}\n",
            result.name,
            pass,
            result
                .failure
                .map(|f| f.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            result
                .error_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            result.error_message.as_deref().unwrap_or("")
        );

        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureKind;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unresolved.txt");
        let writer = UnresolvedWriter::with_path(path.to_string_lossy());

        writer.init().unwrap();
        tokio_test::block_on(writer.write(
            2,
            &LookupResult::service_error("Unknown1", 12, Some("Too many requests".into())),
        ))
        .unwrap();
        tokio_test::block_on(writer.write(
            2,
            &LookupResult::transient("Broken", FailureKind::MalformedResponse, "XML格式错误"),
        ))
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("Unknown1 | 第2轮 | service_error | code=12 | Too many requests\n"));
        assert!(content.contains("Broken | 第2轮 | malformed_response | code=- | XML格式错误\n"));
    }
}
