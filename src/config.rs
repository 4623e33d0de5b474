// 配置模块 - 支持外部配置文件
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 配置文件路径
const CONFIG_FILE: &str = "./config.toml";

/// 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============== 配置结构体 ==============

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub logging: LoggingConfig,
}

/// 兜底分类器的分数阈值
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// 最高分低于该值时判为 unknown
    pub min_score: u32,
    /// videos_by_creator 单独使用的更高阈值
    pub creator_min_score: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing 过滤级别，RUST_LOG 优先
    pub level: String,
}

// ============== 默认配置 ==============

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_score: 2,
            creator_min_score: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============== 配置加载 ==============

impl AppConfig {
    /// 从配置文件加载，失败则使用默认配置
    pub fn load() -> Self {
        // 日志此时尚未初始化
        Self::load_from_file(CONFIG_FILE).unwrap_or_else(|e| {
            eprintln!(" [Config] 无法加载配置文件 '{}': {}", CONFIG_FILE, e);
            eprintln!(" [Config] 使用默认配置");
            Self::default()
        })
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// 从 TOML 文本解析，缺省的字段取默认值
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 生成默认配置文件
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let default_content = include_str!("../config.toml");
        fs::write(path, default_content)?;
        Ok(())
    }
}

// ============== 全局配置实例 ==============

/// 全局配置实例 (懒加载)
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_matches_defaults() {
        let config = AppConfig::from_toml(include_str!("../config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AppConfig::from_toml("[classifier]\nmin_score = 4\n").unwrap();
        assert_eq!(config.classifier.min_score, 4);
        assert_eq!(config.classifier.creator_min_score, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_generate_default_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.toml");
        AppConfig::generate_default_config(&path).unwrap();
        assert_eq!(AppConfig::load_from_file(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = AppConfig::load_from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let broken = AppConfig::from_toml("[classifier\nmin_score = ");
        assert!(matches!(broken, Err(ConfigError::Parse(_))));
    }
}
