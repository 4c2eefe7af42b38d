//! 帧性能分析模块
//!
//! - `frame_stats`：固定窗口的帧统计（环形缓冲区、滚动求和、最差帧）
//! - `section_timer`：作用域区段计时器

mod frame_stats;
mod section_timer;

pub use frame_stats::{FrameSample, FrameStats, SectionSample};
pub use section_timer::SectionTimer;
