//! 帧节拍器
//!
//! 以固定周期驱动帧循环。每帧的状态流转：
//!
//! ```text
//! START → WORK（按顺序逐个执行阶段，每个阶段包在 SectionTimer 中）
//!       → MEASURE_WORK → PACE（先睡眠，最后一小段自旋）
//!       → COMMIT（add_sample）→ 到期则报告 → 下一帧
//! ```
//!
//! 每帧的截止时间都从本帧自身的开始时间重新计算。超时帧直接跳过等待，
//! 后续帧不做补偿，持续超时也不会累积漂移。超时只是被记录的数据，不是错误。

use std::time::{Duration, Instant};

use super::stimulus::StimulusGenerator;
use super::workload::{spin_until, Workload};
use crate::core::config::{PacingConfig, PhaseConfig};
use crate::core::Result;
use crate::profiler::FrameStats;
use crate::report::ReportSink;
use crate::{pacer_debug, pacer_info, pacer_warn};

/// 单帧的测量结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    pub frame_index: u64,
    pub work_duration_us: u64,
    pub total_duration_us: u64,
    /// 工作阶段结束时已过截止时间
    pub overrun: bool,
}

/// 固定周期帧节拍器
pub struct FramePacer {
    target_period: Duration,
    spin_budget: Duration,
    frame_count: u64,
    report_interval: u64,
    phases: Vec<PhaseConfig>,
}

impl FramePacer {
    pub fn new(pacing: &PacingConfig, phases: Vec<PhaseConfig>) -> Self {
        Self {
            target_period: Duration::from_micros(pacing.target_period_us),
            spin_budget: Duration::from_micros(pacing.spin_budget_us),
            frame_count: pacing.frame_count,
            report_interval: pacing.report_interval.max(1),
            phases,
        }
    }

    pub fn target_period(&self) -> Duration {
        self.target_period
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// 本帧结束后是否需要输出报告
    pub fn is_report_due(&self, frame_index: u64) -> bool {
        frame_index % self.report_interval == 0 || frame_index + 1 == self.frame_count
    }

    /// 运行完整的帧循环，返回超时帧的数量
    ///
    /// 只有报告输出的错误会中断循环。
    pub fn run<W: Workload>(
        &self,
        stats: &mut FrameStats,
        stimulus: &mut StimulusGenerator,
        workload: &mut W,
        sinks: &mut [&mut dyn ReportSink],
    ) -> Result<u64> {
        pacer_info!(
            frames = self.frame_count,
            target_us = self.target_period.as_micros() as u64,
            capacity = stats.capacity(),
            phases = ?self.phases.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "Frame loop started"
        );

        let mut overruns = 0;
        for frame_index in 0..self.frame_count {
            let timing = self.run_frame(stats, stimulus, workload, frame_index);
            if timing.overrun {
                overruns += 1;
            }

            let sample = stats.frame(frame_index);
            for sink in sinks.iter_mut() {
                sink.on_frame(stats, sample)?;
            }

            if self.is_report_due(frame_index) {
                pacer_debug!(
                    frame = frame_index,
                    avg_total_us = stats.avg_total_us(),
                    fps = stats.fps(),
                    worst_window_us = stats.worst_frame_window().total_duration_us,
                    "Report snapshot"
                );
                for sink in sinks.iter_mut() {
                    sink.on_report(stats, frame_index)?;
                }
            }
        }

        for sink in sinks.iter_mut() {
            sink.finish(stats)?;
        }

        if overruns > 0 {
            pacer_warn!(overruns, frames = self.frame_count, "Frames missed their deadline");
        }
        pacer_info!(
            frames = self.frame_count,
            overruns,
            worst_overall_us = stats.worst_frame_overall().total_duration_us,
            "Frame loop finished"
        );

        Ok(overruns)
    }

    /// 执行一帧并提交到 `stats`
    pub fn run_frame<W: Workload>(
        &self,
        stats: &mut FrameStats,
        stimulus: &mut StimulusGenerator,
        workload: &mut W,
        frame_index: u64,
    ) -> FrameTiming {
        let frame_start = Instant::now();
        let frame_deadline = frame_start + self.target_period;

        for phase in &self.phases {
            let micros = stimulus.next_micros(phase.load);
            let _timer = stats.section(phase.name.as_str());
            workload.simulate(micros);
        }

        let work_end = Instant::now();
        let work_duration = work_end - frame_start;

        let overrun = work_end >= frame_deadline;
        if overrun {
            pacer_debug!(
                frame = frame_index,
                work_us = work_duration.as_micros() as u64,
                target_us = self.target_period.as_micros() as u64,
                "Frame overrun"
            );
        } else {
            self.wait_until(frame_deadline);
        }

        let total_duration = frame_start.elapsed();
        let timing = FrameTiming {
            frame_index,
            work_duration_us: work_duration.as_micros() as u64,
            total_duration_us: total_duration.as_micros() as u64,
            overrun,
        };

        stats.add_sample(timing.work_duration_us, timing.total_duration_us, frame_index);
        timing
    }

    /// 先睡眠到截止时间前的自旋预算处，再自旋到截止时间
    fn wait_until(&self, deadline: Instant) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining > self.spin_budget {
            std::thread::sleep(remaining - self.spin_budget);
        }
        spin_until(deadline);
    }
}
