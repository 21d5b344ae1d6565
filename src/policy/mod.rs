//! 窗口大小策略（Sizing Policy）
//!
//! 传输引擎每个 tick 只通过一个数值接口向策略询问下一轮的窗口大小：
//! 输入为当前窗口与本 tick 的 ACK/超时标志，输出为新的窗口（可能 < 1，由引擎钳制）。
//! 策略如何得到（手写启发式、拟合出的线性模型、常数）与引擎无关。

mod heuristic;
mod linear;

pub use heuristic::{AimdPolicy, ConstantPolicy};
pub use linear::LinearPolicy;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 策略的输入：当前窗口与本 tick 的结果标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyInput {
    pub window_size: u32,
    pub ack_received: bool,
    pub ack_timed_out: bool,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    /// 模型输出不是有限数（NaN/inf）
    #[error("policy produced a non-finite window size: {value}")]
    NonFinite { value: f64 },

    /// 外部依赖不可用
    #[error("policy unavailable: {0}")]
    Unavailable(String),

    /// 参数非法
    #[error("invalid policy config: {0}")]
    InvalidConfig(String),
}

/// 窗口大小策略接口。
///
/// 实现必须是快速、同步、无副作用的计算；引擎每 tick 恰好调用一次。
pub trait SizingPolicy: Send + std::fmt::Debug {
    fn next_window_size(&self, input: PolicyInput) -> Result<i64, PolicyError>;
}

/// 策略描述（可从 JSON 配置中读取）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicySpec {
    Constant {
        window: u32,
    },
    Aimd {
        #[serde(default = "default_increase")]
        increase: u32,
        #[serde(default = "default_decrease_factor")]
        decrease_factor: f64,
        #[serde(default)]
        max_window: Option<u32>,
    },
    Linear {
        window_coef: f64,
        ack_coef: f64,
        timeout_coef: f64,
        intercept: f64,
    },
}

fn default_increase() -> u32 {
    1
}

fn default_decrease_factor() -> f64 {
    0.5
}

impl Default for PolicySpec {
    fn default() -> Self {
        PolicySpec::Aimd {
            increase: default_increase(),
            decrease_factor: default_decrease_factor(),
            max_window: None,
        }
    }
}

impl PolicySpec {
    /// 在构建前检查参数
    pub fn validate(&self) -> Result<(), PolicyError> {
        match *self {
            PolicySpec::Constant { .. } => Ok(()),
            PolicySpec::Aimd {
                decrease_factor,
                max_window,
                ..
            } => {
                if !(decrease_factor > 0.0 && decrease_factor <= 1.0) {
                    return Err(PolicyError::InvalidConfig(format!(
                        "decrease_factor must be in (0, 1], got {decrease_factor}"
                    )));
                }
                if max_window == Some(0) {
                    return Err(PolicyError::InvalidConfig("max_window must be >= 1".into()));
                }
                Ok(())
            }
            PolicySpec::Linear {
                window_coef,
                ack_coef,
                timeout_coef,
                intercept,
            } => {
                let all_finite = [window_coef, ack_coef, timeout_coef, intercept]
                    .iter()
                    .all(|c| c.is_finite());
                if !all_finite {
                    return Err(PolicyError::InvalidConfig(
                        "linear coefficients must be finite".into(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// 校验并构建策略对象
    pub fn build(&self) -> Result<Box<dyn SizingPolicy>, PolicyError> {
        self.validate()?;
        let policy: Box<dyn SizingPolicy> = match *self {
            PolicySpec::Constant { window } => Box::new(ConstantPolicy { window }),
            PolicySpec::Aimd {
                increase,
                decrease_factor,
                max_window,
            } => Box::new(AimdPolicy {
                increase,
                decrease_factor,
                max_window,
            }),
            PolicySpec::Linear {
                window_coef,
                ack_coef,
                timeout_coef,
                intercept,
            } => Box::new(LinearPolicy {
                window_coef,
                ack_coef,
                timeout_coef,
                intercept,
            }),
        };
        Ok(policy)
    }
}
