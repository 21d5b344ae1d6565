//! Star 拓扑构建：所有主机直连同一台路由器

use crate::error::Result;
use crate::net::{Network, NodeId, RouterConfig};
use crate::policy::SizingPolicy;
use crate::proto::TransportConfig;

/// 一台主机的构建参数
#[derive(Debug)]
pub struct StarHost {
    pub name: String,
    pub transport: TransportConfig,
    pub policy: Box<dyn SizingPolicy>,
}

/// 构建 star 拓扑：先加入全部主机，再加入路由器（推进顺序同加入顺序）。
///
/// 返回：(主机列表, 路由器)
pub fn build_star(
    net: &mut Network,
    hosts: Vec<StarHost>,
    router: RouterConfig,
) -> Result<(Vec<NodeId>, NodeId)> {
    let ids: Vec<NodeId> = hosts
        .into_iter()
        .map(|h| net.add_host(h.name, h.transport, h.policy))
        .collect();
    let r = net.add_router("r0", router);
    for &h in &ids {
        net.link(h, r)?;
    }
    Ok((ids, r))
}
