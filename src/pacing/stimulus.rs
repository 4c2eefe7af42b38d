//! 随机刺激生成器
//!
//! 为每个阶段决定本帧请求多少微秒的模拟工作，偶尔插入尖峰。
//! 使用固定种子的 xorshift64，相同种子产生相同序列，便于复现一次运行。

use crate::core::config::{PhaseLoad, StimulusConfig};

/// xorshift64 伪随机数生成器
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// 种子为 0 时 xorshift 会卡在 0，替换为固定常量
    const ZERO_SEED_FALLBACK: u64 = 0x1234_5678_9ABC_DEF0;

    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { Self::ZERO_SEED_FALLBACK } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// `[min, max]` 闭区间内的均匀整数
    pub fn uniform(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(min <= max);
        let span = max - min;
        if span == u64::MAX {
            return self.next_u64();
        }
        min + self.next_u64() % (span + 1)
    }

    /// `[0, 1)` 内的均匀浮点数
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// 以概率 `p` 返回 true
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// 阶段负载时长生成器
#[derive(Debug, Clone)]
pub struct StimulusGenerator {
    rng: XorShift64,
    normal_us: (u64, u64),
    spike_us: (u64, u64),
    spike_probability: f64,
}

impl StimulusGenerator {
    pub fn from_config(config: &StimulusConfig) -> Self {
        Self {
            rng: XorShift64::new(config.seed),
            normal_us: (config.normal_min_us, config.normal_max_us),
            spike_us: (config.spike_min_us, config.spike_max_us),
            spike_probability: config.spike_probability,
        }
    }

    /// 为一个阶段生成本帧请求的工作时长（微秒）
    pub fn next_micros(&mut self, load: PhaseLoad) -> u64 {
        match load {
            PhaseLoad::Fixed { micros } => micros,
            PhaseLoad::Normal { divisor } => self.normal() / divisor.max(1),
            PhaseLoad::Spiky { divisor } => {
                if self.rng.chance(self.spike_probability) {
                    self.rng.uniform(self.spike_us.0, self.spike_us.1)
                } else {
                    self.normal() / divisor.max(1)
                }
            }
        }
    }

    fn normal(&mut self) -> u64 {
        self.rng.uniform(self.normal_us.0, self.normal_us.1)
    }
}

impl Default for StimulusGenerator {
    fn default() -> Self {
        Self::from_config(&StimulusConfig::default())
    }
}
