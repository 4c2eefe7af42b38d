//! 帧统计模块
//!
//! `FrameStats` 使用固定容量的环形缓冲区保存最近 C 帧的采样，
//! 增量维护窗口内的工作/总时长之和、窗口内最差帧以及全程最差帧，
//! 并收集当前正在测量的帧的区段耗时。
//!
//! # 增量维护
//!
//! - 总和：写入新样本时加上新值；缓冲区已满时先减去即将被覆盖的旧值。
//!   只有 `reset` 会从零重建。
//! - 窗口最差帧：新样本更大时直接替换；当记录持有者滑出窗口
//!   （其帧号落后当前帧号超过 C - 1）时，对整个缓冲区重新扫描一次。
//! - 全程最差帧：只增不减，不会因为滑出窗口而失效。
//!
//! # 调用约定
//!
//! 帧号必须严格递增（通常从 0 开始连续编号）。违反约定时聚合结果未定义，
//! 这是调用方的前置条件，运行时不做检查。

/// 帧内一个具名区段的耗时
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionSample {
    pub name: String,
    pub duration_us: u64,
}

/// 一帧的采样
///
/// `work_duration_us` 是忙碌部分，`total_duration_us` 还包含节拍等待，
/// 因此前者不大于后者。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameSample {
    pub work_duration_us: u64,
    pub total_duration_us: u64,
    pub frame_index: u64,
    /// 按执行顺序排列的区段
    pub sections: Vec<SectionSample>,
}

impl SectionSample {
    pub fn new(name: impl Into<String>, duration_us: u64) -> Self {
        Self {
            name: name.into(),
            duration_us,
        }
    }
}

impl FrameSample {
    /// 按名称查找区段耗时
    pub fn section_us(&self, name: &str) -> Option<u64> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.duration_us)
    }

    pub fn total_ms(&self) -> f64 {
        self.total_duration_us as f64 / 1000.0
    }

    pub fn work_ms(&self) -> f64 {
        self.work_duration_us as f64 / 1000.0
    }
}

/// 固定窗口帧统计
#[derive(Debug, Clone)]
pub struct FrameStats {
    frames: Vec<FrameSample>,
    write_index: usize,
    count: usize,
    sum_work_us: u64,
    sum_total_us: u64,
    worst_window: FrameSample,
    worst_overall: FrameSample,
    pending_sections: Vec<SectionSample>,
}

impl FrameStats {
    /// 默认窗口容量（60 Hz 下约一秒）
    pub const DEFAULT_CAPACITY: usize = 60;

    /// 创建指定容量的统计器
    ///
    /// # Panics
    ///
    /// `capacity` 为 0 时 panic。
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "FrameStats capacity must be greater than 0");
        Self {
            frames: vec![FrameSample::default(); capacity],
            write_index: 0,
            count: 0,
            sum_work_us: 0,
            sum_total_us: 0,
            worst_window: FrameSample::default(),
            worst_overall: FrameSample::default(),
            pending_sections: Vec::new(),
        }
    }

    /// 记录当前帧的一个区段
    ///
    /// 只追加到待提交列表，不影响已提交的环形缓冲区。
    pub fn record_section(&mut self, name: impl Into<String>, duration_us: u64) {
        self.pending_sections.push(SectionSample::new(name, duration_us));
    }

    /// 提交刚结束的一帧
    ///
    /// 待提交的区段被移动到新样本中，随后列表清空供下一帧使用。
    pub fn add_sample(&mut self, work_duration_us: u64, total_duration_us: u64, frame_index: u64) {
        let capacity = self.capacity();
        self.write_index = (frame_index % capacity as u64) as usize;

        if self.is_full() {
            let evicted = &self.frames[self.write_index];
            self.sum_work_us -= evicted.work_duration_us;
            self.sum_total_us -= evicted.total_duration_us;
        }

        let sample = FrameSample {
            work_duration_us,
            total_duration_us,
            frame_index,
            sections: std::mem::take(&mut self.pending_sections),
        };
        self.frames[self.write_index] = sample;

        self.sum_work_us += work_duration_us;
        self.sum_total_us += total_duration_us;

        let written = &self.frames[self.write_index];
        if total_duration_us > self.worst_overall.total_duration_us {
            self.worst_overall = written.clone();
        }
        if total_duration_us > self.worst_window.total_duration_us {
            self.worst_window = written.clone();
        }

        // 记录持有者已滑出窗口
        if frame_index.saturating_sub(self.worst_window.frame_index) > capacity as u64 - 1 {
            self.recalculate_worst_window();
        }

        self.count = (self.count + 1).min(capacity);
    }

    fn recalculate_worst_window(&mut self) {
        let mut worst: Option<&FrameSample> = None;
        for frame in &self.frames {
            if worst.map_or(true, |w| frame.total_duration_us > w.total_duration_us) {
                worst = Some(frame);
            }
        }
        self.worst_window = worst.cloned().unwrap_or_default();
    }

    /// 清空所有状态，等价于重新构造
    pub fn reset(&mut self) {
        let capacity = self.capacity();
        *self = Self::new(capacity);
    }

    /// 窗口内平均工作时长（微秒），窗口为空时返回 0
    pub fn avg_work_us(&self) -> u64 {
        if self.count > 0 {
            self.sum_work_us / self.count as u64
        } else {
            0
        }
    }

    /// 窗口内平均帧时长（微秒），窗口为空时返回 0
    pub fn avg_total_us(&self) -> u64 {
        if self.count > 0 {
            self.sum_total_us / self.count as u64
        } else {
            0
        }
    }

    /// 窗口内的工作时长之和
    pub fn sum_work_us(&self) -> u64 {
        self.sum_work_us
    }

    /// 窗口内的帧时长之和
    pub fn sum_total_us(&self) -> u64 {
        self.sum_total_us
    }

    pub fn worst_frame_overall(&self) -> &FrameSample {
        &self.worst_overall
    }

    pub fn worst_frame_window(&self) -> &FrameSample {
        &self.worst_window
    }

    /// 基于窗口平均帧时长的帧率（Hz），平均值为 0 时返回 0.0
    pub fn fps(&self) -> f64 {
        let avg = self.avg_total_us();
        if avg > 0 {
            1_000_000.0 / avg as f64
        } else {
            0.0
        }
    }

    /// 当前有效样本数
    pub fn window_size(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub fn is_full(&self) -> bool {
        self.count == self.frames.len()
    }

    /// 返回帧号对应槽位中的样本
    ///
    /// 不做越界或淘汰检查：如果该帧已被覆盖，返回的是占用该槽位的新样本。
    /// 调用方需要自行保证帧号仍在窗口内。
    pub fn frame(&self, frame_index: u64) -> &FrameSample {
        &self.frames[(frame_index % self.capacity() as u64) as usize]
    }

    /// 当前帧中尚未提交的区段
    pub fn pending_sections(&self) -> &[SectionSample] {
        &self.pending_sections
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_totals(stats: &mut FrameStats, totals: &[u64], first_index: u64) {
        for (offset, &total) in totals.iter().enumerate() {
            stats.add_sample(total / 2, total, first_index + offset as u64);
        }
    }

    fn window_max(stats: &FrameStats) -> u64 {
        let last = stats.frames.iter().map(|f| f.frame_index).max().unwrap_or(0);
        (0..stats.window_size() as u64)
            .map(|back| stats.frame(last - back).total_duration_us)
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_new_is_empty() {
        let stats = FrameStats::new(30);
        assert_eq!(stats.capacity(), 30);
        assert_eq!(stats.window_size(), 0);
        assert!(!stats.is_full());
        assert_eq!(stats.avg_total_us(), 0);
        assert_eq!(stats.avg_work_us(), 0);
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.worst_frame_window(), &FrameSample::default());
        assert_eq!(stats.worst_frame_overall(), &FrameSample::default());
    }

    #[test]
    fn test_sums_before_wrap() {
        let mut stats = FrameStats::new(8);
        let totals = [16_000, 17_500, 16_200, 30_000, 15_900];
        commit_totals(&mut stats, &totals, 0);

        let expected: u64 = totals.iter().sum();
        assert_eq!(stats.sum_total_us(), expected);
        assert_eq!(stats.avg_total_us(), expected / totals.len() as u64);
        assert_eq!(stats.sum_work_us(), totals.iter().map(|t| t / 2).sum::<u64>());
        assert_eq!(stats.window_size(), totals.len());
    }

    #[test]
    fn test_wrap_evicts_oldest() {
        let mut stats = FrameStats::new(4);
        commit_totals(&mut stats, &[100, 200, 300, 400, 500], 0);

        assert_eq!(stats.window_size(), 4);
        assert!(stats.is_full());
        // 槽位 (C + 1) mod C 只反映最近一次写入
        assert_eq!(stats.frame(4).frame_index, 4);
        assert_eq!(stats.frame(4).total_duration_us, 500);
        assert_eq!(stats.sum_total_us(), 200 + 300 + 400 + 500);
        assert_eq!(stats.avg_total_us(), 350);
    }

    #[test]
    fn test_stale_lookup_returns_slot_occupant() {
        let mut stats = FrameStats::new(3);
        commit_totals(&mut stats, &[10, 20, 30, 40], 0);
        // 帧 0 已被帧 3 覆盖
        assert_eq!(stats.frame(0).frame_index, 3);
    }

    #[test]
    fn test_window_worst_scenario() {
        let mut stats = FrameStats::new(3);
        commit_totals(&mut stats, &[100, 500, 200], 0);
        assert_eq!(stats.worst_frame_window().frame_index, 1);
        assert_eq!(stats.worst_frame_window().total_duration_us, 500);

        stats.add_sample(25, 50, 3);
        assert_eq!(stats.worst_frame_window().frame_index, 1);
        assert_eq!(stats.worst_frame_window().total_duration_us, 500);
        assert_eq!(stats.worst_frame_overall().frame_index, 1);

        stats.add_sample(25, 50, 4);
        assert_eq!(stats.worst_frame_window().frame_index, 2);
        assert_eq!(stats.worst_frame_window().total_duration_us, 200);
        assert_eq!(stats.worst_frame_overall().frame_index, 1);
        assert_eq!(stats.worst_frame_overall().total_duration_us, 500);
    }

    #[test]
    fn test_window_worst_recomputes_after_spike_ages_out() {
        let capacity = 5;
        let mut stats = FrameStats::new(capacity);
        stats.add_sample(10_000, 40_000, 0);
        stats.add_sample(10_000, 20_000, 1);

        for index in 2..(capacity as u64 + 1) {
            stats.add_sample(5_000, 16_000 + index, index);
        }

        // 帧 0 已滑出，帧 1 (20000) 成为窗口最大值
        assert_eq!(stats.worst_frame_window().frame_index, 1);
        assert_eq!(stats.worst_frame_window().total_duration_us, 20_000);
        assert_eq!(stats.worst_frame_overall().total_duration_us, 40_000);
    }

    #[test]
    fn test_window_worst_always_matches_scan() {
        let mut stats = FrameStats::new(7);
        // 确定性的锯齿序列，包含多个尖峰
        let mut value: u64 = 1;
        for index in 0..100u64 {
            value = (value * 37 + 11) % 101;
            let total = if index % 13 == 0 { 50_000 + value } else { 16_000 + value * 10 };
            stats.add_sample(total / 3, total, index);
            assert_eq!(stats.worst_frame_window().total_duration_us, window_max(&stats), "frame {}", index);
        }
    }

    #[test]
    fn test_worst_overall_is_monotonic() {
        let mut stats = FrameStats::new(4);
        let totals = [300, 100, 900, 200, 50, 899, 10, 10, 10, 10];
        let mut previous = 0;
        for (index, &total) in totals.iter().enumerate() {
            stats.add_sample(total, total, index as u64);
            let current = stats.worst_frame_overall().total_duration_us;
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(stats.worst_frame_overall().frame_index, 2);
        assert_eq!(stats.worst_frame_overall().total_duration_us, 900);
    }

    #[test]
    fn test_sections_move_into_committed_sample() {
        let mut stats = FrameStats::new(4);
        stats.record_section("X", 500);
        assert_eq!(stats.pending_sections().len(), 1);

        stats.add_sample(600, 16_000, 0);
        assert_eq!(stats.frame(0).sections, vec![SectionSample::new("X", 500)]);
        assert_eq!(stats.frame(0).section_us("X"), Some(500));
        assert!(stats.pending_sections().is_empty());

        stats.add_sample(600, 16_000, 1);
        assert!(stats.frame(1).sections.is_empty());
    }

    #[test]
    fn test_worst_frames_carry_sections() {
        let mut stats = FrameStats::new(4);
        stats.record_section("Input", 200);
        stats.record_section("Render", 21_000);
        stats.add_sample(21_200, 21_200, 0);

        let worst = stats.worst_frame_overall();
        assert_eq!(worst.sections.len(), 2);
        assert_eq!(worst.section_us("Render"), Some(21_000));
        assert_eq!(stats.worst_frame_window().sections, worst.sections);
    }

    #[test]
    fn test_fps() {
        let mut stats = FrameStats::new(2);
        stats.add_sample(5_000, 20_000, 0);
        stats.add_sample(5_000, 20_000, 1);
        assert!((stats.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_matches_fresh_instance() {
        let mut stats = FrameStats::new(3);
        stats.record_section("AI", 1_000);
        commit_totals(&mut stats, &[100, 500, 200, 50], 0);
        stats.record_section("Physics", 300);

        stats.reset();
        let fresh = FrameStats::new(3);

        assert_eq!(stats.capacity(), fresh.capacity());
        assert_eq!(stats.window_size(), fresh.window_size());
        assert_eq!(stats.is_full(), fresh.is_full());
        assert_eq!(stats.avg_total_us(), fresh.avg_total_us());
        assert_eq!(stats.avg_work_us(), fresh.avg_work_us());
        assert_eq!(stats.fps(), fresh.fps());
        assert_eq!(stats.worst_frame_window(), fresh.worst_frame_window());
        assert_eq!(stats.worst_frame_overall(), fresh.worst_frame_overall());
        assert_eq!(stats.frame(1), fresh.frame(1));
        assert!(stats.pending_sections().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ = FrameStats::new(0);
    }
}
