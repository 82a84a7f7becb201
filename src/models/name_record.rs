use serde::Deserialize;

/// 数据集中的一行：某年某性别某名字的使用比例
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub sex: String,
    pub year: i32,
    pub percent: f64,
}
