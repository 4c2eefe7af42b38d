//! 帧节拍模块
//!
//! - `pacer`：固定周期帧循环（工作 → 测量 → 睡眠 + 自旋 → 提交 → 报告）
//! - `workload`：模拟负载与自旋等待
//! - `stimulus`：可复现的阶段负载时长生成

mod pacer;
mod stimulus;
mod workload;

pub use pacer::{FramePacer, FrameTiming};
pub use stimulus::{StimulusGenerator, XorShift64};
pub use workload::{spin_until, BusyWork, Workload};
