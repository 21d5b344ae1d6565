//! 世界 trait
//!
//! 定义仿真世界接口。

use super::time::Tick;
use crate::error::Result;

/// 仿真世界：由业务层实现（例如网络拓扑/统计等）。
pub trait World {
    /// 推进一个 tick；返回的错误会中止整个仿真
    fn step(&mut self, now: Tick) -> Result<()>;

    /// 世界是否已无事可做（用于提前结束仿真）
    fn is_idle(&self) -> bool {
        false
    }
}
