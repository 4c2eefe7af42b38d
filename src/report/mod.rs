//! 报告输出模块
//!
//! 帧节拍器在每帧提交后、以及到达报告周期时调用 `ReportSink`。
//! 输出只读取 `FrameStats` 的查询接口，不修改统计状态。
//!
//! - `console`：控制台周期报告
//! - `csv`：逐帧 CSV 导出
//! - `summary`：整次运行的汇总（均值/最小/最大、超时帧数、区段均值）

mod console;
mod csv;
mod summary;

pub use console::ConsoleReport;
pub use csv::CsvExporter;
pub use summary::RunSummary;

use crate::core::Result;
use crate::profiler::{FrameSample, FrameStats};

/// 报告输出
///
/// 所有方法默认为空操作，实现者只需覆盖关心的回调。
pub trait ReportSink {
    /// 每帧提交后调用，`sample` 是刚写入的样本
    fn on_frame(&mut self, _stats: &FrameStats, _sample: &FrameSample) -> Result<()> {
        Ok(())
    }

    /// 到达报告周期（以及最后一帧）时调用
    fn on_report(&mut self, _stats: &FrameStats, _frame_index: u64) -> Result<()> {
        Ok(())
    }

    /// 运行结束时调用一次
    fn finish(&mut self, _stats: &FrameStats) -> Result<()> {
        Ok(())
    }
}

fn us_to_ms(micros: u64) -> f64 {
    micros as f64 / 1000.0
}
