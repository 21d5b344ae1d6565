//! 标识符类型
//!
//! 定义节点的唯一标识符。

use serde::{Deserialize, Serialize};

/// 节点标识符（即节点在 `Network` 节点表中的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);
