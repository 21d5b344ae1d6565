//! 事件记录（用于离线分析与回放）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **轻量**：只在内存中累积，仿真结束后一次性写出
//! - **可取样**：窗口策略的每次调用都是一条样本

mod types;

pub use types::{VizEvent, VizEventKind, VizLinkInfo, VizLogger, VizNodeInfo, VizNodeKind, WindowSample};
