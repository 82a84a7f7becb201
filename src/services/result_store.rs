//! 结果存储服务 - 业务能力层
//!
//! 负责两件事：
//! - 每个名字的原始 XML 响应写入 `<raw_dir>/<name>.xml`（按名字覆盖）
//! - 分类结果追加到 `name,is_biblical` 表，每行写完立即 flush
//!
//! 只有编排层持有 `ResultStore`，所有写入都经过它，保证单一写入者。

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::FileError;
use crate::models::ClassificationRecord;

const TABLE_HEADER: [&str; 2] = ["name", "is_biblical"];

/// 名字能否直接作为文件名
fn is_safe_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !matches!(name, "." | "..")
        && !name.contains(&['/', '\\', '\0'][..])
}

/// 原始响应存储
pub struct RawStore {
    dir: PathBuf,
}

impl RawStore {
    /// 创建存储，目录不存在时自动创建
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FileError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FileError::CreateDirFailed {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn record_path(&self, name: &str) -> Result<PathBuf, FileError> {
        if !is_safe_file_name(name) {
            return Err(FileError::InvalidRecordName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.xml", name)))
    }

    /// 写入原始响应，已存在则覆盖
    pub fn store(&self, name: &str, raw: &str) -> Result<PathBuf, FileError> {
        let path = self.record_path(name)?;
        fs::write(&path, raw.trim()).map_err(|e| FileError::write_failed(path.display().to_string(), e))?;
        debug!("原始响应已保存: {}", path.display());
        Ok(path)
    }
}

/// 分类结果表（只追加）
pub struct ClassificationTable {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl ClassificationTable {
    /// 打开结果表
    ///
    /// - `resume == false`：重建文件，写入表头
    /// - `resume == true`：文件已有内容时保留并追加，否则同上
    pub fn open(path: impl Into<PathBuf>, resume: bool) -> Result<Self, FileError> {
        let path = path.into();
        let path_str = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| FileError::CreateDirFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let keep_existing = resume && has_content(&path);
        let opened = if keep_existing {
            OpenOptions::new().append(true).open(&path)
        } else {
            File::create(&path)
        };
        let file = opened.map_err(|e| FileError::write_failed(&path_str, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !keep_existing {
            writer
                .write_record(TABLE_HEADER)
                .map_err(|e| FileError::csv(&path_str, e))?;
            writer
                .flush()
                .map_err(|e| FileError::write_failed(&path_str, e))?;
        }

        Ok(Self { path, writer })
    }

    /// 追加一行并立即 flush
    pub fn append(&mut self, record: &ClassificationRecord) -> Result<(), FileError> {
        let path_str = self.path.display().to_string();
        self.writer
            .serialize(record)
            .map_err(|e| FileError::csv(&path_str, e))?;
        self.writer
            .flush()
            .map_err(|e| FileError::write_failed(&path_str, e))?;
        Ok(())
    }
}

/// 存储门面：原始响应 + 分类结果表
pub struct ResultStore {
    raw: RawStore,
    table: ClassificationTable,
}

impl ResultStore {
    pub fn new(raw: RawStore, table: ClassificationTable) -> Self {
        Self { raw, table }
    }

    pub fn open(raw_dir: impl Into<PathBuf>, table_path: impl Into<PathBuf>, resume: bool) -> Result<Self, FileError> {
        Ok(Self::new(RawStore::new(raw_dir)?, ClassificationTable::open(table_path, resume)?))
    }

    pub fn store_raw(&self, name: &str, raw: &str) -> Result<(), FileError> {
        self.raw.store(name, raw).map(|_| ())
    }

    pub fn append_classification(&mut self, name: &str, is_biblical: bool) -> Result<(), FileError> {
        self.table.append(&ClassificationRecord::new(name, is_biblical))
    }
}

/// 读取结果表中的全部记录
///
/// 文件不存在时返回空列表。
pub fn read_classifications(path: &Path) -> Result<Vec<ClassificationRecord>, FileError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let path_str = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| FileError::csv(&path_str, e))?;

    reader
        .deserialize::<ClassificationRecord>()
        .map(|row| row.map_err(|e| FileError::csv(&path_str, e)))
        .collect()
}

fn has_content(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
