//! 节点接口
//!
//! 主机与路由器共同的抽象：身份、收件、每 tick 推进、拓扑连接。

use super::host::Host;
use super::id::NodeId;
use super::network::Network;
use super::router::Router;
use super::segment::Segment;
use crate::error::Result;
use crate::sim::Tick;
use crate::viz::VizNodeKind;

/// 节点接口
pub trait Node: Send + std::fmt::Debug {
    /// 获取节点标识符
    fn id(&self) -> NodeId;

    /// 获取节点名称
    fn name(&self) -> &str;

    fn kind(&self) -> VizNodeKind;

    /// 收件箱容量
    fn capacity(&self) -> usize;

    /// 邻居交付一个段（满则静默丢弃）
    fn on_receive(&mut self, seg: Segment);

    /// 累计被丢弃的段数
    fn dropped(&self) -> u64;

    /// 记录一个直连邻居
    fn link(&mut self, neighbor: NodeId);

    /// 推进一个 tick
    fn step(&mut self, now: Tick, net: &mut Network) -> Result<()>;

    /// 没有任何待处理工作
    fn is_idle(&self) -> bool;

    fn as_host(&self) -> Option<&Host> {
        None
    }

    fn as_host_mut(&mut self) -> Option<&mut Host> {
        None
    }

    fn as_router_mut(&mut self) -> Option<&mut Router> {
        None
    }
}
