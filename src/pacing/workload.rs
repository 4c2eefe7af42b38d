//! 模拟负载
//!
//! 帧循环中的各阶段通过 `Workload` 消耗 CPU 时间。
//! 实际耗时只是近似值：`BusyWork` 每 256 次迭代才检查一次时钟，可能略微超出。

use std::time::{Duration, Instant};

/// 按请求时长消耗 CPU 的负载源
pub trait Workload {
    fn simulate(&mut self, micros: u64);
}

impl<F: FnMut(u64)> Workload for F {
    fn simulate(&mut self, micros: u64) {
        self(micros)
    }
}

/// 忙等负载
#[derive(Debug, Default)]
pub struct BusyWork {
    scratch: u64,
}

impl BusyWork {
    /// 每隔多少次迭代检查一次时钟，避免频繁读取时钟的开销
    const CHECK_EVERY: u32 = 256;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Workload for BusyWork {
    fn simulate(&mut self, micros: u64) {
        let end = Instant::now() + Duration::from_micros(micros);
        let mut iter: u32 = 0;

        loop {
            // 廉价运算保持 CPU 忙碌
            self.scratch = self.scratch.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            self.scratch ^= self.scratch >> 13;

            iter = iter.wrapping_add(1);
            if iter % Self::CHECK_EVERY == 0 && Instant::now() >= end {
                break;
            }
        }

        std::hint::black_box(self.scratch);
    }
}

/// 自旋直到指定时间点
pub fn spin_until(deadline: Instant) {
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}
