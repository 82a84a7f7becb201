use crate::models::name_record::NameRecord;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tokio::fs;

/// 从 CSV 文件加载名字数据集
///
/// 表头为 `name,sex,year,percent`。无法解析的行会被跳过并记录警告，
/// 不影响其它行。
pub async fn load_name_records(csv_file_path: &Path) -> Result<Vec<NameRecord>> {
    let content = fs::read_to_string(csv_file_path)
        .await
        .with_context(|| format!("无法读取数据集文件: {}", csv_file_path.display()))?;

    parse_name_records(&content)
        .with_context(|| format!("无法解析数据集文件: {}", csv_file_path.display()))
}

pub fn parse_name_records(content: &str) -> Result<Vec<NameRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    // 表头本身不对就没必要继续
    let headers = reader.headers().context("缺少表头")?.clone();
    if !headers.iter().any(|h| h == "name") {
        anyhow::bail!("表头中没有 name 列: {:?}", headers);
    }

    let mut records = Vec::new();
    for (line_num, row) in reader.deserialize::<NameRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("跳过第 {} 行: {}", line_num + 2, e);
            }
        }
    }

    Ok(records)
}

/// 去重后的名字，保持第一次出现的顺序
pub fn unique_names(records: &[NameRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.name.as_str()))
        .map(|r| r.name.clone())
        .collect()
}

/// 按性别统计不重复名字的数量
pub fn unique_names_by_sex(records: &[NameRecord]) -> BTreeMap<String, usize> {
    let mut per_sex: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for record in records {
        per_sex
            .entry(record.sex.as_str())
            .or_default()
            .insert(record.name.as_str());
    }
    per_sex
        .into_iter()
        .map(|(sex, names)| (sex.to_string(), names.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
year,name,percent,sex
1880,John,0.081541,boy
1880,William,0.080511,boy
1880,Mary,0.072381,girl
1881,John,0.08,boy
1881,Mary,0.07,girl
1881,John,0.01,girl
";

    #[test]
    fn test_parse_and_unique_order() {
        let records = parse_name_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].year, 1880);
        assert_eq!(unique_names(&records), vec!["John", "William", "Mary"]);
    }

    #[test]
    fn test_unique_names_by_sex() {
        let records = parse_name_records(SAMPLE).unwrap();
        let counts = unique_names_by_sex(&records);
        assert_eq!(counts.get("boy"), Some(&2));
        assert_eq!(counts.get("girl"), Some(&2));
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let content = "name,sex,year,percent\nMary,girl,1880,0.07\nBroken,girl,notayear,0.1\n";
        let records = parse_name_records(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Mary");
    }

    #[test]
    fn test_missing_name_column() {
        assert!(parse_name_records("foo,bar\n1,2\n").is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_name_records(Path::new("/definitely/not/here.csv")).await;
        assert!(result.is_err());
    }
}
