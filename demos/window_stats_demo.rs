//! 窗口统计演示
//!
//! 不运行真实的帧循环，直接向容量为 3 的 `FrameStats` 提交帧，
//! 演示窗口最差帧在记录持有者滑出窗口后如何重新计算。
//!
//! # 运行方式
//!
//! ```bash
//! cargo run --example window_stats_demo
//! ```

use frame_pacer::profiler::FrameStats;
use frame_pacer::report::{ConsoleReport, ReportSink};

fn main() -> frame_pacer::core::Result<()> {
    println!("=== frame_pacer 窗口统计演示 ===");

    let mut stats = FrameStats::new(3);
    let mut report = ConsoleReport::stdout();

    let frames: [(u64, &[(&str, u64)]); 5] = [
        (100, &[("Update", 60), ("Draw", 40)]),
        (500, &[("Update", 80), ("Draw", 420)]),
        (200, &[("Update", 70), ("Draw", 130)]),
        (50, &[("Update", 20), ("Draw", 30)]),
        (50, &[("Update", 25), ("Draw", 25)]),
    ];

    for (index, (total, sections)) in frames.iter().enumerate() {
        for &(name, micros) in sections.iter() {
            stats.record_section(name, micros);
        }
        stats.add_sample(*total, *total, index as u64);
        report.on_report(&stats, index as u64)?;
    }

    println!(
        "\n窗口最差帧: {} ({} us)，全程最差帧: {} ({} us)",
        stats.worst_frame_window().frame_index,
        stats.worst_frame_window().total_duration_us,
        stats.worst_frame_overall().frame_index,
        stats.worst_frame_overall().total_duration_us,
    );

    Ok(())
}
