//! 步进驱动器
//!
//! 定义离散时间步进驱动器，维护当前 tick 并逐步推进世界。

use super::time::Tick;
use super::world::World;
use crate::error::Result;
use tracing::{debug, info};

/// 离散时间驱动器：每次调用 `World::step` 推进一个 tick。
#[derive(Debug, Default)]
pub struct Stepper {
    now: Tick,
}

impl Stepper {
    /// 获取当前 tick（下一次 step 将使用的时间）
    pub fn now(&self) -> Tick {
        self.now
    }

    /// 推进单个 tick
    pub fn step(&mut self, world: &mut dyn World) -> Result<()> {
        world.step(self.now)?;
        self.now = self.now.next();
        Ok(())
    }

    /// 连续推进 `ticks` 个 tick。
    #[tracing::instrument(skip(self, world), fields(start = %self.now))]
    pub fn run_for(&mut self, ticks: u64, world: &mut dyn World) -> Result<()> {
        info!(ticks, "▶️  开始运行仿真");
        for _ in 0..ticks {
            self.step(world)?;
        }
        info!(final_tick = %self.now, "✅ 仿真完成");
        Ok(())
    }

    /// 推进直到世界空闲，或者达到 `max_ticks` 上限。
    ///
    /// 返回实际推进的 tick 数。
    #[tracing::instrument(skip(self, world), fields(start = %self.now))]
    pub fn run_until_idle(&mut self, max_ticks: u64, world: &mut dyn World) -> Result<u64> {
        info!(max_ticks, "▶️  开始运行仿真（空闲即停）");
        let mut stepped = 0;
        while stepped < max_ticks {
            self.step(world)?;
            stepped += 1;
            if world.is_idle() {
                debug!(now = %self.now, "世界已空闲");
                break;
            }
        }
        info!(stepped, final_tick = %self.now, "✅ 仿真完成");
        Ok(stepped)
    }
}
