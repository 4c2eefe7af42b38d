//! 配置管理模块
//!
//! 提供帧节拍器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [pacing]
//! target_period_us = 16666   # 60 Hz
//! frame_count = 300
//! spin_budget_us = 1000
//! report_interval = 30
//!
//! [profiler]
//! capacity = 60
//!
//! [stimulus]
//! seed = 12345
//! spike_probability = 0.05
//!
//! [[phases]]
//! name = "Input"
//! load = { kind = "fixed", micros = 200 }
//!
//! [[phases]]
//! name = "Render"
//! load = { kind = "spiky", divisor = 3 }
//!
//! [output]
//! csv_enabled = true
//! csv_path = "frame_stats.csv"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use super::error::{ConfigError, ProfilerError, Result};

/// 运行配置
///
/// 包含了帧循环运行所需的所有配置项。
/// 可以从配置文件加载，也可以通过代码构建。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 帧节拍配置
    #[serde(default)]
    pub pacing: PacingConfig,

    /// 统计窗口配置
    #[serde(default)]
    pub profiler: ProfilerConfig,

    /// 模拟负载的随机刺激配置
    #[serde(default)]
    pub stimulus: StimulusConfig,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 每帧按顺序执行的阶段
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseConfig>,
}

/// 帧节拍配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// 目标帧周期（微秒）
    #[serde(default = "default_target_period")]
    pub target_period_us: u64,

    /// 总帧数
    #[serde(default = "default_frame_count")]
    pub frame_count: u64,

    /// 截止时间前改为自旋等待的预算（微秒），用于吸收系统调度误差
    #[serde(default = "default_spin_budget")]
    pub spin_budget_us: u64,

    /// 每隔多少帧输出一次报告
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
}

/// 统计窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// 环形缓冲区容量（窗口大小）
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// 随机刺激配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StimulusConfig {
    /// 随机种子（固定种子保证每次运行可复现）
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_normal_min")]
    pub normal_min_us: u64,

    #[serde(default = "default_normal_max")]
    pub normal_max_us: u64,

    #[serde(default = "default_spike_min")]
    pub spike_min_us: u64,

    #[serde(default = "default_spike_max")]
    pub spike_max_us: u64,

    /// 尖峰出现的概率
    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,
}

/// 单个阶段的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// 阶段名称（同时作为区段名和 CSV 列名）
    pub name: String,

    /// 负载模型
    pub load: PhaseLoad,
}

/// 阶段负载模型
///
/// 决定每帧为该阶段请求多少微秒的模拟工作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PhaseLoad {
    /// 固定时长
    Fixed { micros: u64 },
    /// 常规区间内均匀取值后除以 `divisor`
    Normal { divisor: u64 },
    /// 与 `Normal` 相同，但按概率出现尖峰区间的取值
    Spiky { divisor: u64 },
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 是否导出 CSV
    #[serde(default = "default_csv_enabled")]
    pub csv_enabled: bool,

    /// CSV 文件路径
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    /// 是否在控制台输出周期报告
    #[serde(default = "default_console_report")]
    pub console_report: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_target_period() -> u64 { 16_666 }
fn default_frame_count() -> u64 { 300 }
fn default_spin_budget() -> u64 { 1_000 }
fn default_report_interval() -> u64 { 30 }
fn default_capacity() -> usize { 60 }
fn default_seed() -> u64 { 12_345 }
fn default_normal_min() -> u64 { 2_000 }
fn default_normal_max() -> u64 { 8_000 }
fn default_spike_min() -> u64 { 12_000 }
fn default_spike_max() -> u64 { 25_000 }
fn default_spike_probability() -> f64 { 0.05 }
fn default_csv_enabled() -> bool { true }
fn default_csv_path() -> String { "frame_stats.csv".to_string() }
fn default_console_report() -> bool { true }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "frame_pacer.log".to_string() }

fn default_phases() -> Vec<PhaseConfig> {
    vec![
        PhaseConfig::new("Input", PhaseLoad::Fixed { micros: 200 }),
        PhaseConfig::new("AI", PhaseLoad::Normal { divisor: 3 }),
        PhaseConfig::new("Physics", PhaseLoad::Normal { divisor: 3 }),
        PhaseConfig::new("Render", PhaseLoad::Spiky { divisor: 3 }),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            profiler: ProfilerConfig::default(),
            stimulus: StimulusConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            phases: default_phases(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            target_period_us: default_target_period(),
            frame_count: default_frame_count(),
            spin_budget_us: default_spin_budget(),
            report_interval: default_report_interval(),
        }
    }
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            normal_min_us: default_normal_min(),
            normal_max_us: default_normal_max(),
            spike_min_us: default_spike_min(),
            spike_max_us: default_spike_max(),
            spike_probability: default_spike_probability(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_enabled: default_csv_enabled(),
            csv_path: default_csv_path(),
            console_report: default_console_report(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl PhaseConfig {
    pub fn new(name: impl Into<String>, load: PhaseLoad) -> Self {
        Self {
            name: name.into(),
            load,
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use frame_pacer::core::Config;
    ///
    /// let config = Config::from_file("config.toml")?;
    /// # Ok::<(), frame_pacer::core::ProfilerError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，仅在文件不存在时使用默认配置
    ///
    /// 文件存在但无法解析时返回错误，避免配置中的拼写错误被默认值静默覆盖。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::from_file(path) {
            Err(ProfilerError::Config(ConfigError::FileNotFound(_))) => Ok(Self::default()),
            other => other,
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--frames <n>`: 总帧数
    /// - `--capacity <n>`: 统计窗口容量
    /// - `--target-us <n>`: 目标帧周期（微秒）
    /// - `--seed <n>`: 随机种子
    /// - `--csv <path>`: CSV 输出路径（同时启用 CSV 导出）
    /// - `--no-csv`: 关闭 CSV 导出
    /// - `--quiet`: 关闭控制台周期报告
    ///
    /// 无法解析的数值会被忽略，保留原值。
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if let Some(frames) = value_after(&args, "--frames") {
            self.pacing.frame_count = frames;
        }

        if let Some(capacity) = value_after(&args, "--capacity") {
            self.profiler.capacity = capacity;
        }

        if let Some(target) = value_after(&args, "--target-us") {
            self.pacing.target_period_us = target;
        }

        if let Some(seed) = value_after(&args, "--seed") {
            self.stimulus.seed = seed;
        }

        if let Some(path) = value_after::<String>(&args, "--csv") {
            self.output.csv_enabled = true;
            self.output.csv_path = path;
        }

        if args.iter().any(|a| a == "--no-csv") {
            self.output.csv_enabled = false;
        }

        if args.iter().any(|a| a == "--quiet") {
            self.output.console_report = false;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        let pacing = &self.pacing;
        if pacing.target_period_us == 0 {
            return Err(ConfigError::invalid("pacing.target_period_us", "Target period must be greater than 0").into());
        }
        if pacing.frame_count == 0 {
            return Err(ConfigError::invalid("pacing.frame_count", "Frame count must be greater than 0").into());
        }
        if pacing.report_interval == 0 {
            return Err(ConfigError::invalid("pacing.report_interval", "Report interval must be greater than 0").into());
        }
        if pacing.spin_budget_us >= pacing.target_period_us {
            return Err(ConfigError::invalid(
                "pacing.spin_budget_us",
                "Spin budget must be smaller than the target period",
            )
            .into());
        }

        if self.profiler.capacity == 0 {
            return Err(ConfigError::invalid("profiler.capacity", "Capacity must be greater than 0").into());
        }

        let stimulus = &self.stimulus;
        if stimulus.normal_min_us > stimulus.normal_max_us {
            return Err(ConfigError::invalid("stimulus.normal_min_us/normal_max_us", "Range is inverted").into());
        }
        if stimulus.spike_min_us > stimulus.spike_max_us {
            return Err(ConfigError::invalid("stimulus.spike_min_us/spike_max_us", "Range is inverted").into());
        }
        if !(0.0..=1.0).contains(&stimulus.spike_probability) {
            return Err(ConfigError::invalid(
                "stimulus.spike_probability",
                "Probability must be within [0, 1]",
            )
            .into());
        }

        let mut seen = HashSet::new();
        for phase in &self.phases {
            if phase.name.is_empty() {
                return Err(ConfigError::invalid("phases.name", "Phase name must not be empty").into());
            }
            if !seen.insert(phase.name.as_str()) {
                return Err(ConfigError::invalid(
                    "phases.name",
                    format!("Duplicate phase name '{}'", phase.name),
                )
                .into());
            }
            match phase.load {
                PhaseLoad::Normal { divisor: 0 } | PhaseLoad::Spiky { divisor: 0 } => {
                    return Err(ConfigError::invalid(
                        format!("phases.{}.load.divisor", phase.name),
                        "Divisor must be greater than 0",
                    )
                    .into());
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// 按配置顺序返回阶段名称
    pub fn phase_names(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.name.clone()).collect()
    }
}

fn value_after<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1)?.parse().ok()
}
