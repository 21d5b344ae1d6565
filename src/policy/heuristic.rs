//! 手写启发式策略

use super::{PolicyError, PolicyInput, SizingPolicy};

/// 常数窗口
#[derive(Debug, Clone, Copy)]
pub struct ConstantPolicy {
    pub window: u32,
}

impl SizingPolicy for ConstantPolicy {
    fn next_window_size(&self, _input: PolicyInput) -> Result<i64, PolicyError> {
        Ok(self.window as i64)
    }
}

/// AIMD：收到 ACK 的 tick 加性增长，超时的 tick 乘性减小，其余 tick 保持。
///
/// 同一 tick 既有 ACK 又有超时时，以超时为准。
#[derive(Debug, Clone, Copy)]
pub struct AimdPolicy {
    pub increase: u32,
    pub decrease_factor: f64,
    pub max_window: Option<u32>,
}

impl SizingPolicy for AimdPolicy {
    fn next_window_size(&self, input: PolicyInput) -> Result<i64, PolicyError> {
        let w = input.window_size as i64;
        let next = if input.ack_timed_out {
            (w as f64 * self.decrease_factor).floor() as i64
        } else if input.ack_received {
            w.saturating_add(self.increase as i64)
        } else {
            w
        };
        Ok(match self.max_window {
            Some(max) => next.min(max as i64),
            None => next,
        })
    }
}
