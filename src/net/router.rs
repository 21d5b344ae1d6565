//! 路由器节点
//!
//! 路由器只做转发：每个 tick 从收件箱按到达顺序取出至多 `rate` 个段，
//! 交给下一跳。目的地直连时直接交付，否则查静态路由表；查不到则丢弃。

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::id::NodeId;
use super::network::Network;
use super::node::Node;
use super::segment::Segment;
use crate::error::Result;
use crate::queue::BoundedBuffer;
use crate::sim::Tick;
use crate::viz::VizNodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// 收件箱容量（数据段个数）
    pub capacity: usize,
    /// 每 tick 最多转发的段数；None 表示不限
    pub rate: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            rate: None,
        }
    }
}

#[derive(Debug)]
pub struct Router {
    id: NodeId,
    name: String,
    rate: Option<usize>,
    inbox: BoundedBuffer,
    neighbors: BTreeSet<NodeId>,
    routes: HashMap<NodeId, NodeId>,
}

impl Router {
    pub fn new(id: NodeId, name: impl Into<String>, cfg: RouterConfig) -> Self {
        Self {
            id,
            name: name.into(),
            rate: cfg.rate,
            inbox: BoundedBuffer::new(cfg.capacity),
            neighbors: BTreeSet::new(),
            routes: HashMap::new(),
        }
    }

    /// 设置静态路由：去往 `dst` 的段交给 `via`
    pub fn add_route(&mut self, dst: NodeId, via: NodeId) {
        self.routes.insert(dst, via);
    }

    /// 查询下一跳
    pub fn next_hop(&self, dst: NodeId) -> Option<NodeId> {
        if self.neighbors.contains(&dst) {
            return Some(dst);
        }
        self.routes.get(&dst).copied()
    }

    pub fn queued(&self) -> usize {
        self.inbox.len()
    }
}

impl Node for Router {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> VizNodeKind {
        VizNodeKind::Router
    }

    fn capacity(&self) -> usize {
        self.inbox.capacity()
    }

    fn on_receive(&mut self, seg: Segment) {
        self.inbox.push(seg);
    }

    fn dropped(&self) -> u64 {
        self.inbox.dropped()
    }

    fn link(&mut self, neighbor: NodeId) {
        self.neighbors.insert(neighbor);
    }

    #[tracing::instrument(skip_all, fields(node_name = %self.name, node_id = ?self.id, now = %now))]
    fn step(&mut self, now: Tick, net: &mut Network) -> Result<()> {
        let batch = match self.rate {
            Some(rate) => self.inbox.drain_up_to(rate),
            None => self.inbox.drain_all(),
        };
        if batch.is_empty() {
            return Ok(());
        }
        debug!(count = batch.len(), backlog = self.inbox.len(), "🔀 Router 转发");

        for seg in batch {
            match self.next_hop(seg.dst) {
                Some(next) => {
                    trace!(seq = seg.seq, dst = ?seg.dst, next = ?next, "下一跳");
                    net.deliver(next, seg);
                }
                None => net.on_unroutable(self.id, seg),
            }
        }
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.inbox.is_empty()
    }

    fn as_router_mut(&mut self) -> Option<&mut Router> {
        Some(self)
    }
}
