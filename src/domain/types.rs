// ==========================================
// 签证排期库存 - 领域类型定义
// ==========================================
// 职责: 报告月份枚举、排序键
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报告月份 (Report Month)
// ==========================================
// 序列化格式: 英文全称 (与报表单元格一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl ReportMonth {
    /// 日历顺序
    pub const ALL: [ReportMonth; 12] = [
        ReportMonth::January,
        ReportMonth::February,
        ReportMonth::March,
        ReportMonth::April,
        ReportMonth::May,
        ReportMonth::June,
        ReportMonth::July,
        ReportMonth::August,
        ReportMonth::September,
        ReportMonth::October,
        ReportMonth::November,
        ReportMonth::December,
    ];

    /// 按英文全称匹配（大小写敏感）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// 月份序号 (1-12)
    pub fn index(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportMonth::January => "January",
            ReportMonth::February => "February",
            ReportMonth::March => "March",
            ReportMonth::April => "April",
            ReportMonth::May => "May",
            ReportMonth::June => "June",
            ReportMonth::July => "July",
            ReportMonth::August => "August",
            ReportMonth::September => "September",
            ReportMonth::October => "October",
            ReportMonth::November => "November",
            ReportMonth::December => "December",
        }
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==========================================
// 排序键 (Sort Key)
// ==========================================
// 格式: YYYY-MM（零填充），字符串比较即时间顺序
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKey(String);

impl SortKey {
    /// 年份须在 0..=9999 内，才能保证 4 位宽度
    pub fn new(year: i32, month: ReportMonth) -> Option<Self> {
        if !(0..=9999).contains(&year) {
            return None;
        }
        Some(Self(format!("{:04}-{:02}", year, month.index())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for SortKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
