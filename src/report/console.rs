//! 控制台周期报告

use std::io::{self, Write};

use super::{us_to_ms, ReportSink};
use crate::core::Result;
use crate::profiler::{FrameSample, FrameStats};

/// 以文本形式输出窗口统计快照
pub struct ConsoleReport<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReport<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, label: &str, frame: &FrameSample) -> io::Result<()> {
        writeln!(
            self.out,
            "Worst ({}): Frame {} = {:.2} ms",
            label,
            frame.frame_index,
            frame.total_ms()
        )?;
        for section in &frame.sections {
            writeln!(
                self.out,
                "  {:<10}: {:>7.2} ms",
                section.name,
                us_to_ms(section.duration_us)
            )?;
        }
        Ok(())
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn on_report(&mut self, stats: &FrameStats, frame_index: u64) -> Result<()> {
        writeln!(self.out, "\n=== Frame {} ===", frame_index)?;
        writeln!(
            self.out,
            "Window Avg: {:.2} ms | FPS: {:.2} | Window: {}/{}",
            us_to_ms(stats.avg_total_us()),
            stats.fps(),
            stats.window_size(),
            stats.capacity()
        )?;
        self.write_frame("Window", stats.worst_frame_window())?;
        self.write_frame("Overall", stats.worst_frame_overall())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_layout() {
        let mut stats = FrameStats::new(3);
        stats.record_section("Input", 200);
        stats.record_section("Render", 21_000);
        stats.add_sample(21_200, 21_200, 0);
        stats.add_sample(4_000, 16_800, 1);

        let mut report = ConsoleReport::new(Vec::new());
        report.on_report(&stats, 1).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("=== Frame 1 ==="));
        assert!(text.contains("Window Avg: 19.00 ms | FPS: 52.63 | Window: 2/3"));
        assert!(text.contains("Worst (Window): Frame 0 = 21.20 ms"));
        assert!(text.contains("Worst (Overall): Frame 0 = 21.20 ms"));
        assert!(text.contains("  Input     :    0.20 ms"));
        assert!(text.contains("  Render    :   21.00 ms"));
    }

    #[test]
    fn test_frames_are_not_reported() {
        let mut stats = FrameStats::new(3);
        stats.add_sample(1, 2, 0);
        let mut report = ConsoleReport::new(Vec::new());
        report.on_frame(&stats, stats.frame(0)).unwrap();
        assert!(report.into_inner().is_empty());
    }
}
