//! 错误类型
//!
//! 仿真中唯一的“异常”路径：窗口策略失败、拓扑配置错误、场景描述非法。
//! 丢包、重复 ACK 等协议层面的问题都走正常流程，不会出现在这里。

use thiserror::Error;

use crate::net::NodeId;
use crate::policy::PolicyError;

/// 仿真驱动器可见的错误
#[derive(Debug, Error)]
pub enum SimError {
    /// 窗口策略调用失败：没有内部兜底值，必须上抛给驱动器
    #[error("sizing policy failed on node {node:?}: {source}")]
    Policy {
        node: NodeId,
        #[source]
        source: PolicyError,
    },

    /// 引用了不存在的节点
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// 节点不是主机（例如对路由器调用 enqueue）
    #[error("node {0:?} is not a host")]
    NotAHost(NodeId),

    #[error("node {0:?} is not a router")]
    NotARouter(NodeId),

    /// 主机尚未连接邻居
    #[error("host {0:?} has no connected neighbor")]
    NotLinked(NodeId),

    /// 场景描述非法
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
