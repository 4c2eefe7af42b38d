//! frame_pacer - 固定窗口帧性能分析器与帧节拍循环
//!
//! 本库测量、聚合并报告一个固定周期（例如 60 Hz）更新循环的逐帧耗时。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、错误处理）
//! - `profiler`: 帧统计（环形缓冲区、窗口/全程最差帧）与区段计时器
//! - `pacing`: 帧节拍循环、模拟负载与随机刺激
//! - `report`: 控制台报告、CSV 导出与运行汇总
//!
//! # 使用示例
//!
//! ```
//! use frame_pacer::profiler::FrameStats;
//!
//! let mut stats = FrameStats::new(3);
//! for (index, total) in [100, 500, 200, 50, 50].into_iter().enumerate() {
//!     stats.add_sample(total / 2, total, index as u64);
//! }
//!
//! // 帧 1 已滑出窗口，窗口最差帧重新计算为帧 2
//! assert_eq!(stats.worst_frame_window().frame_index, 2);
//! assert_eq!(stats.worst_frame_overall().total_duration_us, 500);
//! ```

pub mod core;
pub mod profiler;
pub mod pacing;
pub mod report;
