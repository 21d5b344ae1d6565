//! 网络模拟模块
//!
//! 此模块包含网络模拟的外围组件：节点、数据段、拓扑与统计信息。
//! 端点的传输状态机本身在 `proto` 中。

// 子模块声明
mod host;
mod id;
mod network;
mod node;
mod router;
mod segment;
mod stats;

// 重新导出公共接口
pub use host::Host;
pub use id::NodeId;
pub use network::Network;
pub use node::Node;
pub use router::{Router, RouterConfig};
pub use segment::{Segment, SegmentKind};
pub use stats::Stats;
