//! 仿真核心模块
//!
//! 离散时间仿真：tick 时钟、世界接口、步进驱动器，以及场景描述。

// 子模块声明
mod scenario;
mod stepper;
mod time;
mod world;

// 重新导出公共接口
pub use scenario::{FlowSpec, HostReport, HostSpec, ScenarioReport, ScenarioSpec, ScenarioWorld};
pub use stepper::Stepper;
pub use time::Tick;
pub use world::World;
