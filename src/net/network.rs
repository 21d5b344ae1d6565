//! 网络拓扑管理
//!
//! 持有所有节点、连接关系、统计信息与可选的事件记录。
//! 每个 tick 按节点加入顺序依次推进，顺序固定且由外部决定。

use tracing::{debug, trace, warn};

use super::host::Host;
use super::id::NodeId;
use super::node::Node;
use super::router::{Router, RouterConfig};
use super::segment::Segment;
use super::stats::Stats;
use crate::error::{Result, SimError};
use crate::policy::SizingPolicy;
use crate::proto::{TickOutcome, TransportConfig};
use crate::sim::{Tick, World};
use crate::viz::{VizEventKind, VizLinkInfo, VizLogger, VizNodeInfo};

/// 网络拓扑
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Option<Box<dyn Node>>>,
    links: Vec<(NodeId, NodeId)>,
    now: Tick,
    pub stats: Stats,
    pub viz: Option<VizLogger>,
}

impl Network {
    /// 添加主机节点
    pub fn add_host(
        &mut self,
        name: impl Into<String>,
        cfg: TransportConfig,
        policy: Box<dyn SizingPolicy>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Host::new(id, name, cfg, policy))));
        id
    }

    /// 添加路由器节点
    pub fn add_router(&mut self, name: impl Into<String>, cfg: RouterConfig) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Router::new(id, name, cfg))));
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> Result<&dyn Node> {
        self.nodes
            .get(id.0)
            .and_then(|n| n.as_deref())
            .ok_or(SimError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Box<dyn Node>> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SimError::UnknownNode(id))
    }

    /// 连接两个节点（双向）
    pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.node(a)?;
        self.node(b)?;
        self.node_mut(a)?.link(b);
        self.node_mut(b)?.link(a);
        self.links.push((a, b));
        Ok(())
    }

    /// 在路由器上设置静态路由
    pub fn add_route(&mut self, router: NodeId, dst: NodeId, via: NodeId) -> Result<()> {
        self.node(dst)?;
        self.node(via)?;
        self.node_mut(router)?
            .as_router_mut()
            .ok_or(SimError::NotARouter(router))?
            .add_route(dst, via);
        Ok(())
    }

    pub fn host(&self, id: NodeId) -> Option<&Host> {
        self.nodes.get(id.0)?.as_deref()?.as_host()
    }

    pub fn host_mut(&mut self, id: NodeId) -> Option<&mut Host> {
        self.nodes.get_mut(id.0)?.as_mut()?.as_host_mut()
    }

    /// 所有主机（按加入顺序）
    pub fn hosts(&self) -> impl Iterator<Item = &Host> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.as_deref().and_then(|n| n.as_host()))
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).ok().map(|n| n.name())
    }

    /// 应用层：让 `src` 主机向 `dst` 发送一个 DATA 段
    pub fn enqueue_for_send(&mut self, src: NodeId, dst: NodeId) -> Result<u64> {
        self.node(dst)?;
        let host = self
            .node_mut(src)?
            .as_host_mut()
            .ok_or(SimError::NotAHost(src))?;
        Ok(host.enqueue_for_send(dst))
    }

    /// 把一个段交给节点的收件箱（满则静默丢弃，只计入统计）
    pub fn deliver(&mut self, to: NodeId, seg: Segment) {
        let now = self.now;
        let Some(node) = self.nodes.get_mut(to.0).and_then(Option::as_mut) else {
            warn!(?to, seq = seg.seq, "目标节点不存在，丢弃");
            self.stats.dropped += 1;
            return;
        };

        let before = node.dropped();
        node.on_receive(seg);
        if node.dropped() > before {
            trace!(?to, seq = seg.seq, kind = ?seg.kind, "收件箱已满，尾丢弃");
            self.stats.dropped += 1;
            if let Some(v) = self.viz.as_mut() {
                v.push(
                    now.0,
                    VizEventKind::Drop {
                        node: to.0,
                        seq: seg.seq,
                        seg_kind: seg.kind,
                    },
                );
            }
        } else {
            self.stats.delivered += 1;
        }
    }

    /// 路由器找不到下一跳
    pub(crate) fn on_unroutable(&mut self, at: NodeId, seg: Segment) {
        warn!(?at, seq = seg.seq, dst = ?seg.dst, "无路由，丢弃");
        self.stats.unroutable += 1;
        if let Some(v) = self.viz.as_mut() {
            v.push(
                self.now.0,
                VizEventKind::Unroutable {
                    node: at.0,
                    seq: seg.seq,
                    dst: seg.dst.0,
                },
            );
        }
    }

    /// 记录主机一次 tick 的结果
    pub(crate) fn record_tick(&mut self, node: NodeId, now: Tick, outcome: &TickOutcome) {
        let acks = outcome.transmit.len() - outcome.admitted;
        self.stats.acks_sent += acks as u64;
        self.stats.data_sent += outcome.admitted as u64;
        self.stats.retransmits += outcome.retransmitted.len() as u64;
        if outcome.flags.ack_timed_out {
            self.stats.timeout_ticks += 1;
        }

        let Some(v) = self.viz.as_mut() else {
            return;
        };
        let t = now.0;
        for s in &outcome.rtt_samples {
            v.push(
                t,
                VizEventKind::RecvAck {
                    node: node.0,
                    seq: s.seq,
                    rtt: s.rtt,
                },
            );
        }
        if !outcome.requeued.is_empty() {
            v.push(
                t,
                VizEventKind::Requeue {
                    node: node.0,
                    seqs: outcome.requeued.clone(),
                },
            );
        }
        v.push(
            t,
            VizEventKind::Window {
                node: node.0,
                window_size: outcome.window_before,
                ack_received: outcome.flags.ack_received,
                ack_timed_out: outcome.flags.ack_timed_out,
                next_window: outcome.window_size,
            },
        );
        for seg in &outcome.transmit {
            let kind = if seg.is_data() {
                VizEventKind::SendData {
                    node: node.0,
                    dst: seg.dst.0,
                    seq: seg.seq,
                    retrans: outcome.retransmitted.contains(&seg.seq),
                }
            } else {
                VizEventKind::SendAck {
                    node: node.0,
                    dst: seg.dst.0,
                    seq: seg.seq,
                }
            };
            v.push(t, kind);
        }
    }

    /// 按加入顺序推进所有节点一个 tick。
    ///
    /// 处理某个节点时先把它从节点表中取出，避免 `&mut self` 与 `&mut node` 重叠借用；
    /// 出错时也会先放回节点再返回。
    pub fn step(&mut self, now: Tick) -> Result<()> {
        self.now = now;
        trace!(%now, nodes = self.nodes.len(), "推进网络");
        for i in 0..self.nodes.len() {
            let Some(mut node) = self.nodes[i].take() else {
                continue;
            };
            let res = node.step(now, self);
            self.nodes[i] = Some(node);
            res?;
        }
        Ok(())
    }

    /// 所有节点都没有待处理工作
    pub fn is_idle(&self) -> bool {
        self.nodes.iter().flatten().all(|n| n.is_idle())
    }

    /// 写入拓扑元信息事件（需要先启用 viz）
    pub fn emit_viz_meta(&mut self) {
        let nodes = self
            .nodes
            .iter()
            .flatten()
            .map(|n| VizNodeInfo {
                id: n.id().0,
                name: n.name().to_string(),
                kind: n.kind(),
                capacity: n.capacity(),
            })
            .collect();
        let links = self
            .links
            .iter()
            .map(|&(a, b)| VizLinkInfo { a: a.0, b: b.0 })
            .collect();
        if let Some(v) = self.viz.as_mut() {
            debug!("写入 viz meta");
            v.push(self.now.0, VizEventKind::Meta { nodes, links });
        }
    }
}

impl World for Network {
    fn step(&mut self, now: Tick) -> Result<()> {
        Network::step(self, now)
    }

    fn is_idle(&self) -> bool {
        Network::is_idle(self)
    }
}
