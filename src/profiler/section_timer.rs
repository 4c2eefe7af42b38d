//! 区段计时器
//!
//! `SectionTimer` 是一个作用域守卫：创建时记录当前时间，
//! 在 `Drop` 时把经过的微秒数写入 `FrameStats` 的待提交区段列表。
//! 无论作用域以正常返回、提前 `return`、`?` 传播还是 panic 展开退出，
//! 每个计时器都恰好记录一次。
//!
//! # 使用示例
//!
//! ```
//! use frame_pacer::profiler::{FrameStats, SectionTimer};
//!
//! let mut stats = FrameStats::new(60);
//! {
//!     let _timer = SectionTimer::new("Physics", &mut stats);
//!     // 模拟物理计算
//! }
//! assert_eq!(stats.pending_sections()[0].name, "Physics");
//! ```

use std::time::Instant;

use super::frame_stats::FrameStats;

/// 区段作用域计时器
pub struct SectionTimer<'a> {
    name: Option<String>,
    stats: &'a mut FrameStats,
    start: Instant,
}

impl<'a> SectionTimer<'a> {
    pub fn new(name: impl Into<String>, stats: &'a mut FrameStats) -> Self {
        Self {
            name: Some(name.into()),
            stats,
            start: Instant::now(),
        }
    }

    /// 区段名称
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl Drop for SectionTimer<'_> {
    fn drop(&mut self) {
        let elapsed_us = self.start.elapsed().as_micros() as u64;
        if let Some(name) = self.name.take() {
            self.stats.record_section(name, elapsed_us);
        }
    }
}

impl FrameStats {
    /// 为当前帧开启一个区段计时器
    pub fn section(&mut self, name: impl Into<String>) -> SectionTimer<'_> {
        SectionTimer::new(name, self)
    }

    /// 在区段计时器内执行 `f`，返回 `f` 的结果
    pub fn time_section<R>(&mut self, name: impl Into<String>, f: impl FnOnce() -> R) -> R {
        let _timer = self.section(name);
        f()
    }
}
