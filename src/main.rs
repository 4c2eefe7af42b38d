//! frame_pacer - 帧节拍与性能分析演示程序
//!
//! 以固定周期（默认 60 Hz）运行一个模拟更新循环，每帧依次执行
//! Input / AI / Physics / Render 阶段，统计窗口与全程的帧耗时。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件（config.toml，不存在时使用默认配置）
//! cargo run
//!
//! # 命令行覆盖
//! cargo run -- --frames 600 --capacity 30 --csv out.csv
//! ```

use anyhow::Context;

use frame_pacer::core::{log, Config};
use frame_pacer::pacing::{BusyWork, FramePacer, StimulusGenerator};
use frame_pacer::profiler::FrameStats;
use frame_pacer::report::{ConsoleReport, CsvExporter, ReportSink, RunSummary};
use frame_pacer::{app_error, app_info};

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml，不存在时使用默认配置）
/// 2. 应用命令行参数覆盖并验证
/// 3. 初始化日志系统
/// 4. 构建统计器、刺激源、负载和报告输出
/// 5. 运行帧循环并输出汇总
fn main() -> anyhow::Result<()> {
    let mut config = Config::load_or_default("config.toml").context("Failed to load config.toml")?;
    config.apply_args(std::env::args().skip(1));
    config.validate().context("Invalid configuration")?;

    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("Failed to initialize logging")?;
    app_info!(version = env!("CARGO_PKG_VERSION"), "frame_pacer starting");

    let phase_names = config.phase_names();
    let mut stats = FrameStats::new(config.profiler.capacity);
    let mut stimulus = StimulusGenerator::from_config(&config.stimulus);
    let mut workload = BusyWork::new();
    let pacer = FramePacer::new(&config.pacing, config.phases.clone());

    let mut summary = RunSummary::new(config.pacing.target_period_us, phase_names.clone());
    let mut console = ConsoleReport::stdout();
    let mut csv = if config.output.csv_enabled {
        let exporter = CsvExporter::create(&config.output.csv_path, phase_names)
            .context("Failed to open CSV output")?;
        app_info!(path = %config.output.csv_path, "CSV export enabled");
        Some(exporter)
    } else {
        None
    };

    let result = {
        let mut sinks: Vec<&mut dyn ReportSink> = vec![&mut summary];
        if config.output.console_report {
            sinks.push(&mut console);
        }
        if let Some(csv) = csv.as_mut() {
            sinks.push(csv);
        }
        pacer.run(&mut stats, &mut stimulus, &mut workload, &mut sinks)
    };

    let overruns = match result {
        Ok(overruns) => overruns,
        Err(e) => {
            app_error!("Frame loop aborted: {}", e);
            return Err(e).context("Frame loop aborted");
        }
    };

    println!("\n{}", summary);
    app_info!(frames = summary.frames(), overruns, "frame_pacer finished");
    Ok(())
}
