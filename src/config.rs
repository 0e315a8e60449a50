//! 配置模块，负责加载JSON配置文件

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认的最大分组嵌套深度
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// 检索式编译器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// 圆括号分组允许的最大嵌套深度，超过时解析器返回内部错误
    pub max_nesting_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl CompilerConfig {
    pub fn with_max_nesting_depth(max_nesting_depth: usize) -> Self {
        Self { max_nesting_depth }
    }

    /// 从JSON文件加载配置，缺失的字段使用默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        // 检查文件是否存在
        if !path_ref.exists() {
            return Err(ConfigError::Missing(path_ref.to_path_buf()));
        }

        // 读取文件内容
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        // 解析JSON
        let config: CompilerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path_ref.to_path_buf(),
                source,
            })?;

        config.validate()?;
        tracing::debug!(path = %path_ref.display(), ?config, "loaded compiler config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_valid_json_config() {
        let file = write_config(r#"{ "max_nesting_depth": 8 }"#);
        let config = CompilerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_nesting_depth, 8);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config("{}");
        let config = CompilerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, CompilerConfig::default());
    }

    #[test]
    fn test_invalid_json_config() {
        let file = write_config("invalid json");
        let result = CompilerConfig::from_json_file(file.path());
        assert!(matches!(result, Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let file = write_config(r#"{ "max_nesting_depth": 0 }"#);
        let result = CompilerConfig::from_json_file(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = CompilerConfig::from_json_file("non_existent_file.json");
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_default_config() {
        assert_eq!(CompilerConfig::default().max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }
}
