//! 线性回归策略
//!
//! 对应离线拟合出的线性模型：
//! `pred = window_coef * window + ack_coef * ack + timeout_coef * timeout + intercept`，
//! 结果向零截断为整数。

use serde::{Deserialize, Serialize};

use super::{PolicyError, PolicyInput, SizingPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub window_coef: f64,
    pub ack_coef: f64,
    pub timeout_coef: f64,
    pub intercept: f64,
}

impl LinearPolicy {
    pub fn predict(&self, input: PolicyInput) -> f64 {
        let ack = if input.ack_received { 1.0 } else { 0.0 };
        let timeout = if input.ack_timed_out { 1.0 } else { 0.0 };
        self.window_coef * input.window_size as f64
            + self.ack_coef * ack
            + self.timeout_coef * timeout
            + self.intercept
    }
}

impl SizingPolicy for LinearPolicy {
    fn next_window_size(&self, input: PolicyInput) -> Result<i64, PolicyError> {
        let value = self.predict(input);
        if !value.is_finite() {
            return Err(PolicyError::NonFinite { value });
        }
        // `as` 向零截断，超出 i64 范围时饱和
        Ok(value.trunc() as i64)
    }
}
