//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 特性
//!
//! - 结构化日志：支持键值对
//! - 灵活输出：支持控制台和文件输出
//! - 日志级别：trace, debug, info, warn, error
//!
//! # 使用示例
//!
//! ```no_run
//! use frame_pacer::core::log;
//! use frame_pacer::core::config::LogLevel;
//!
//! log::init_logger(LogLevel::Info, false, None)?;
//!
//! // 结构化日志
//! tracing::info!(frames = 300, target_us = 16666, "Run started");
//! # Ok::<(), frame_pacer::core::ProfilerError>(())
//! ```

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;
use super::error::{ProfilerError, Result};

/// 初始化日志系统
///
/// 应在程序开始时调用一次，重复初始化会返回 `ProfilerError::Log`。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "frame_pacer.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let filter = build_filter(level);

    let result = if file_output {
        // 解析日志文件路径
        let log_path = log_file_path.unwrap_or("frame_pacer.log");
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("frame_pacer.log");

        // 创建滚动文件 appender（每天滚动）
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            directory,
            filename
        );

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };

    result.map_err(|e| ProfilerError::Log(e.to_string()))
}

/// 按配置的日志级别构建过滤器
fn build_filter(level: LogLevel) -> EnvFilter {
    let max_level = LevelFilter::from_level(Level::from(level));
    EnvFilter::default().add_directive(max_level.into())
}

/// 帧节拍器日志 - Info 级别
#[macro_export]
macro_rules! pacer_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "frame_pacer::pacer", $($arg)*)
    };
}

/// 帧节拍器日志 - Debug 级别
#[macro_export]
macro_rules! pacer_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "frame_pacer::pacer", $($arg)*)
    };
}

/// 帧节拍器日志 - Warn 级别
#[macro_export]
macro_rules! pacer_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "frame_pacer::pacer", $($arg)*)
    };
}

/// 应用层日志 - Info 级别
#[macro_export]
macro_rules! app_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "frame_pacer::app", $($arg)*)
    };
}

/// 应用层日志 - Error 级别
#[macro_export]
macro_rules! app_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "frame_pacer::app", $($arg)*)
    };
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
