//! 传输层/协议模块
//!
//! 端点的可靠传输状态机：缓冲待发数据、跟踪未确认段、检测超时并重排重发、
//! 每个 tick 按策略调整窗口。

mod engine;
mod state;

pub use engine::{EngineCounters, RttSample, TickFlags, TickOutcome, TransportEngine};
pub use state::{AckMatch, InFlight, TransportConfig, TransportState};
