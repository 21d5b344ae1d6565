//! 主机节点
//!
//! 主机持有一个传输引擎，每个 tick 运行引擎并把产出的段交给直连邻居。

use tracing::{debug, warn};

use super::id::NodeId;
use super::network::Network;
use super::node::Node;
use super::segment::Segment;
use crate::error::{Result, SimError};
use crate::policy::SizingPolicy;
use crate::proto::{TransportConfig, TransportEngine};
use crate::sim::Tick;
use crate::viz::VizNodeKind;

#[derive(Debug)]
pub struct Host {
    id: NodeId,
    name: String,
    neighbor: Option<NodeId>,
    engine: TransportEngine,
}

impl Host {
    /// 创建新主机；窗口策略在构造时注入，之后不再更换
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        cfg: TransportConfig,
        policy: Box<dyn SizingPolicy>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            neighbor: None,
            engine: TransportEngine::new(id, cfg, policy),
        }
    }

    /// 转发目标（路由器或另一台主机）
    pub fn neighbor(&self) -> Option<NodeId> {
        self.neighbor
    }

    pub fn engine(&self) -> &TransportEngine {
        &self.engine
    }

    /// 应用层发送一个 DATA 段，返回序号
    pub fn enqueue_for_send(&mut self, dst: NodeId) -> u64 {
        self.engine.enqueue_for_send(dst)
    }

    /// 所有已入队的段都已被确认
    pub fn is_done(&self) -> bool {
        let c = self.engine.counters();
        c.enqueued > 0 && self.engine.state().is_idle()
    }
}

impl Node for Host {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> VizNodeKind {
        VizNodeKind::Host
    }

    fn capacity(&self) -> usize {
        self.engine.inbox().capacity()
    }

    fn on_receive(&mut self, seg: Segment) {
        self.engine.on_receive(seg);
    }

    fn dropped(&self) -> u64 {
        self.engine.inbox().dropped()
    }

    fn link(&mut self, neighbor: NodeId) {
        if let Some(old) = self.neighbor.replace(neighbor) {
            warn!(host = %self.name, ?old, new = ?neighbor, "主机只有一个邻居，覆盖旧连接");
        }
    }

    #[tracing::instrument(skip_all, fields(node_name = %self.name, node_id = ?self.id, now = %now))]
    fn step(&mut self, now: Tick, net: &mut Network) -> Result<()> {
        // 有待处理的段却没有邻居：在 tick 之前报错，不改动传输状态
        if self.neighbor.is_none() && !self.engine.is_idle() {
            return Err(SimError::NotLinked(self.id));
        }
        let outcome = self
            .engine
            .tick(now)
            .map_err(|source| SimError::Policy {
                node: self.id,
                source,
            })?;
        net.record_tick(self.id, now, &outcome);

        if outcome.transmit.is_empty() {
            return Ok(());
        }
        let next = self.neighbor.ok_or(SimError::NotLinked(self.id))?;
        debug!(count = outcome.transmit.len(), next = ?next, "🖥️  Host 转发本 tick 的段");
        for seg in outcome.transmit {
            net.deliver(next, seg);
        }
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.engine.is_idle()
    }

    fn as_host(&self) -> Option<&Host> {
        Some(self)
    }

    fn as_host_mut(&mut self) -> Option<&mut Host> {
        Some(self)
    }
}
