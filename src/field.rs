//! 字段代码：限定检索词作用的元数据字段

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownFieldCode;

/// 可识别的字段代码（封闭集合）
///
/// 解析时不区分大小写，输出时统一为小写。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldCode {
    /// 标题 `ti`
    #[serde(rename = "ti")]
    Title,
    /// 摘要 `abs`
    #[serde(rename = "abs")]
    Abstract,
    /// 关键词 `key`
    #[serde(rename = "key")]
    Keyword,
    /// 标题 + 摘要 `tiabs`
    #[serde(rename = "tiabs")]
    TitleAbstract,
    /// 标题 + 摘要 + 关键词 `tiabskey`
    #[serde(rename = "tiabskey")]
    TitleAbstractKeyword,
}

impl FieldCode {
    pub const ALL: [FieldCode; 5] = [
        FieldCode::Title,
        FieldCode::Abstract,
        FieldCode::Keyword,
        FieldCode::TitleAbstract,
        FieldCode::TitleAbstractKeyword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCode::Title => "ti",
            FieldCode::Abstract => "abs",
            FieldCode::Keyword => "key",
            FieldCode::TitleAbstract => "tiabs",
            FieldCode::TitleAbstractKeyword => "tiabskey",
        }
    }

    /// 不区分大小写地查找字段代码
    pub fn lookup(code: &str) -> Option<FieldCode> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldCode {
    type Err = UnknownFieldCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldCode::lookup(s).ok_or_else(|| UnknownFieldCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(FieldCode::lookup("TI"), Some(FieldCode::Title));
        assert_eq!(FieldCode::lookup("Abs"), Some(FieldCode::Abstract));
        assert_eq!(FieldCode::lookup("tiAbsKey"), Some(FieldCode::TitleAbstractKeyword));
        assert_eq!(FieldCode::lookup("invalid"), None);
        assert_eq!(FieldCode::lookup(""), None);
    }

    #[test]
    fn test_display_is_lowercase() {
        let rendered: Vec<_> = FieldCode::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(rendered, vec!["ti", "abs", "key", "tiabs", "tiabskey"]);
    }

    #[test]
    fn test_from_str_error() {
        let err = "title".parse::<FieldCode>().unwrap_err();
        assert_eq!(err, UnknownFieldCode("title".to_string()));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&FieldCode::TitleAbstract).unwrap();
        assert_eq!(json, r#""tiabs""#);
        let back: FieldCode = serde_json::from_str(r#""key""#).unwrap();
        assert_eq!(back, FieldCode::Keyword);
    }
}
