//! 错误处理模块
//!
//! 定义了帧分析器中使用的统一错误类型。
//!
//! 聚合核心（`FrameStats`、`SectionTimer`）本身没有错误路径：
//! 超时帧是数据而不是错误。只有配置加载、日志初始化和报告输出会失败。

use std::fmt;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, ProfilerError>;

/// 帧分析器的错误类型
#[derive(Debug)]
pub enum ProfilerError {
    /// 配置错误
    Config(ConfigError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),

    /// 报告输出错误
    Report(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// 构造 `InvalidValue` 的便捷方法
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProfilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfilerError::Config(e) => write!(f, "Configuration error: {}", e),
            ProfilerError::Io(e) => write!(f, "IO error: {}", e),
            ProfilerError::Log(msg) => write!(f, "Log error: {}", msg),
            ProfilerError::Report(msg) => write!(f, "Report error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ProfilerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfilerError::Config(e) => Some(e),
            ProfilerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for ProfilerError {
    fn from(err: std::io::Error) -> Self {
        ProfilerError::Io(err)
    }
}

impl From<ConfigError> for ProfilerError {
    fn from(err: ConfigError) -> Self {
        ProfilerError::Config(err)
    }
}
