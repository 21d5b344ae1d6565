//! Dumbbell 拓扑构建

use crate::error::{Result, SimError};
use crate::net::{Network, NodeId, RouterConfig};
use crate::policy::PolicySpec;
use crate::proto::TransportConfig;

/// Dumbbell 拓扑配置选项
#[derive(Debug, Clone, Default)]
pub struct DumbbellOpts {
    pub transport: TransportConfig,
    pub policy: PolicySpec,
    /// 两端路由器（r0/r1）的配置
    pub router: RouterConfig,
    /// 瓶颈方向 r0 -> r1 的转发速率；None 表示沿用 `router.rate`
    pub bottleneck_rate: Option<usize>,
}

/// 构建结果
#[derive(Debug, Clone, Copy)]
pub struct Dumbbell {
    pub h0: NodeId,
    pub h1: NodeId,
    pub r0: NodeId,
    pub r1: NodeId,
}

/// 构建 dumbbell 拓扑
///
/// 拓扑结构：h0 <-> r0 <-> r1 <-> h1
/// 节点推进顺序：h0, h1, r0, r1
pub fn build_dumbbell(net: &mut Network, opts: &DumbbellOpts) -> Result<Dumbbell> {
    let policy = |spec: &PolicySpec, host: &str| {
        spec.build()
            .map_err(|e| SimError::InvalidScenario(format!("{host}: {e}")))
    };
    let h0 = net.add_host("h0", opts.transport, policy(&opts.policy, "h0")?);
    let h1 = net.add_host("h1", opts.transport, policy(&opts.policy, "h1")?);

    let r0_cfg = RouterConfig {
        rate: opts.bottleneck_rate.or(opts.router.rate),
        ..opts.router
    };
    let r0 = net.add_router("r0", r0_cfg);
    let r1 = net.add_router("r1", opts.router);

    net.link(h0, r0)?;
    net.link(r0, r1)?;
    net.link(r1, h1)?;

    // r0/r1 只直连一侧主机，另一侧经由对端路由器
    net.add_route(r0, h1, r1)?;
    net.add_route(r1, h0, r0)?;

    Ok(Dumbbell { h0, h1, r0, r1 })
}
