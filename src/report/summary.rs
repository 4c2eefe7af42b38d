//! 运行汇总
//!
//! 与窗口统计不同，汇总覆盖整次运行的所有帧。

use std::fmt;

use super::{us_to_ms, ReportSink};
use crate::core::Result;
use crate::profiler::{FrameSample, FrameStats};

/// 整次运行的汇总统计
#[derive(Debug, Clone)]
pub struct RunSummary {
    target_period_us: u64,
    frames: u64,
    sum_total_us: u64,
    min_total_us: Option<u64>,
    max_total_us: u64,
    deadline_misses: u64,
    /// 每帧提交后窗口帧率之和
    sum_fps: f64,
    fps_samples: u64,
    /// (名称, 累计微秒)，按配置顺序
    sections: Vec<(String, u64)>,
}

impl RunSummary {
    pub fn new(target_period_us: u64, phase_names: Vec<String>) -> Self {
        Self {
            target_period_us,
            frames: 0,
            sum_total_us: 0,
            min_total_us: None,
            max_total_us: 0,
            deadline_misses: 0,
            sum_fps: 0.0,
            fps_samples: 0,
            sections: phase_names.into_iter().map(|name| (name, 0)).collect(),
        }
    }

    /// 记录一帧
    pub fn record(&mut self, sample: &FrameSample) {
        self.frames += 1;
        self.sum_total_us += sample.total_duration_us;
        self.max_total_us = self.max_total_us.max(sample.total_duration_us);
        self.min_total_us = Some(
            self.min_total_us
                .map_or(sample.total_duration_us, |min| min.min(sample.total_duration_us)),
        );
        if sample.work_duration_us >= self.target_period_us {
            self.deadline_misses += 1;
        }
        for (name, total) in &mut self.sections {
            *total += sample.section_us(name).unwrap_or(0);
        }
    }

    /// 记录一帧提交后的窗口帧率
    pub fn record_fps(&mut self, fps: f64) {
        self.sum_fps += fps;
        self.fps_samples += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// 工作时长达到或超过目标周期的帧数
    pub fn deadline_misses(&self) -> u64 {
        self.deadline_misses
    }

    pub fn mean_total_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        us_to_ms(self.sum_total_us) / self.frames as f64
    }

    /// 窗口帧率的全程均值，未记录时返回 0.0
    pub fn mean_fps(&self) -> f64 {
        if self.fps_samples == 0 {
            return 0.0;
        }
        self.sum_fps / self.fps_samples as f64
    }

    pub fn min_total_ms(&self) -> f64 {
        us_to_ms(self.min_total_us.unwrap_or(0))
    }

    pub fn max_total_ms(&self) -> f64 {
        us_to_ms(self.max_total_us)
    }

    /// 各阶段平均耗时（毫秒），按配置顺序
    pub fn section_averages_ms(&self) -> Vec<(&str, f64)> {
        self.sections
            .iter()
            .map(|(name, total)| {
                let avg = if self.frames == 0 {
                    0.0
                } else {
                    us_to_ms(*total) / self.frames as f64
                };
                (name.as_str(), avg)
            })
            .collect()
    }
}

impl ReportSink for RunSummary {
    fn on_frame(&mut self, stats: &FrameStats, sample: &FrameSample) -> Result<()> {
        self.record(sample);
        self.record_fps(stats.fps());
        Ok(())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Summary Statistics ===")?;
        writeln!(f, "Total Frames: {}", self.frames)?;
        writeln!(f, "Average Frame Time: {:.2} ms", self.mean_total_ms())?;
        writeln!(f, "Average FPS: {:.2}", self.mean_fps())?;
        writeln!(f, "Min Frame Time: {:.2} ms", self.min_total_ms())?;
        writeln!(f, "Max Frame Time: {:.2} ms", self.max_total_ms())?;
        writeln!(f, "Missed Deadlines: {}", self.deadline_misses)?;
        writeln!(f, "Section Averages:")?;
        for (name, avg) in self.section_averages_ms() {
            writeln!(f, "  {}: {:.2} ms", name, avg)?;
        }
        Ok(())
    }
}
