//! 仿真时间类型
//!
//! 定义离散仿真时钟（tick）。

use serde::{Deserialize, Serialize};

/// 离散仿真时间步（tick 序号）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// 距离 `earlier` 过去了多少个 tick（饱和减法，时钟不会倒退）
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// 下一个 tick
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }

    pub fn after(self, ticks: u64) -> Tick {
        Tick(self.0.saturating_add(ticks))
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}
