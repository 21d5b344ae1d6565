//! 场景描述与运行
//!
//! 场景（JSON）描述一个 star 拓扑：若干主机直连一台路由器，
//! 以及在指定 tick 开始的若干条流（src 向 dst 发送 `segments` 个 DATA 段）。

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::time::Tick;
use super::world::World;
use crate::error::{Result, SimError};
use crate::net::{Network, NodeId, RouterConfig, Stats};
use crate::policy::PolicySpec;
use crate::proto::TransportConfig;
use crate::topo::star::{StarHost, build_star};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// 最多运行多少个 tick
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// 所有流完成且网络空闲后提前结束
    #[serde(default = "default_true")]
    pub stop_when_idle: bool,
    /// 主机默认传输配置
    #[serde(default)]
    pub transport: TransportConfig,
    /// 主机默认窗口策略
    #[serde(default)]
    pub policy: PolicySpec,
    #[serde(default)]
    pub router: RouterConfig,
    pub hosts: Vec<HostSpec>,
    #[serde(default)]
    pub flows: Vec<FlowSpec>,
}

fn default_ticks() -> u64 {
    1_000
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSpec {
    pub name: String,
    #[serde(default)]
    pub transport: Option<TransportConfig>,
    #[serde(default)]
    pub policy: Option<PolicySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSpec {
    pub src: String,
    pub dst: String,
    pub segments: u64,
    #[serde(default)]
    pub start_tick: u64,
}

impl ScenarioSpec {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| SimError::InvalidScenario(e.to_string()))
    }

    /// 检查主机名唯一、流引用的主机存在、策略参数合法
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(SimError::InvalidScenario("no hosts".into()));
        }
        let mut names = HashSet::new();
        for h in &self.hosts {
            if !names.insert(h.name.as_str()) {
                return Err(SimError::InvalidScenario(format!(
                    "duplicate host name {:?}",
                    h.name
                )));
            }
            let policy = h.policy.as_ref().unwrap_or(&self.policy);
            policy
                .validate()
                .map_err(|e| SimError::InvalidScenario(format!("host {:?}: {e}", h.name)))?;
        }
        for f in &self.flows {
            for end in [&f.src, &f.dst] {
                if !names.contains(end.as_str()) {
                    return Err(SimError::InvalidScenario(format!("flow references unknown host {end:?}")));
                }
            }
            if f.src == f.dst {
                return Err(SimError::InvalidScenario(format!(
                    "flow from {:?} to itself",
                    f.src
                )));
            }
        }
        Ok(())
    }

    /// 校验并构建可运行的场景世界
    pub fn build(&self) -> Result<ScenarioWorld> {
        self.validate()?;

        let mut net = Network::default();
        let mut star_hosts = Vec::with_capacity(self.hosts.len());
        for h in &self.hosts {
            let policy = h
                .policy
                .as_ref()
                .unwrap_or(&self.policy)
                .build()
                .map_err(|e| SimError::InvalidScenario(format!("host {:?}: {e}", h.name)))?;
            star_hosts.push(StarHost {
                name: h.name.clone(),
                transport: h.transport.unwrap_or(self.transport),
                policy,
            });
        }
        let (hosts, router) = build_star(&mut net, star_hosts, self.router)?;

        let by_name: BTreeMap<&str, NodeId> = self
            .hosts
            .iter()
            .map(|h| h.name.as_str())
            .zip(hosts.iter().copied())
            .collect();
        let mut pending: Vec<PendingFlow> = self
            .flows
            .iter()
            .map(|f| PendingFlow {
                src: by_name[f.src.as_str()],
                dst: by_name[f.dst.as_str()],
                segments: f.segments,
                start: Tick(f.start_tick),
            })
            .collect();
        // 倒序存放，便于从尾部按时间弹出
        pending.sort_by(|a, b| b.start.cmp(&a.start));

        Ok(ScenarioWorld {
            net,
            hosts,
            router,
            pending,
            done_at: BTreeMap::new(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingFlow {
    src: NodeId,
    dst: NodeId,
    segments: u64,
    start: Tick,
}

/// 场景世界：在网络之上按时间注入应用流量，并记录各主机的完成时刻。
#[derive(Debug)]
pub struct ScenarioWorld {
    pub net: Network,
    pub hosts: Vec<NodeId>,
    pub router: NodeId,
    pending: Vec<PendingFlow>,
    done_at: BTreeMap<NodeId, Tick>,
}

impl ScenarioWorld {
    fn inject_due_flows(&mut self, now: Tick) -> Result<()> {
        while let Some(f) = self.pending.last().copied() {
            if f.start > now {
                break;
            }
            self.pending.pop();
            debug!(src = ?f.src, dst = ?f.dst, segments = f.segments, %now, "注入流量");
            for _ in 0..f.segments {
                self.net.enqueue_for_send(f.src, f.dst)?;
            }
            self.done_at.remove(&f.src);
        }
        Ok(())
    }

    /// 主机最近一次发完所有数据的 tick
    pub fn done_at(&self, host: NodeId) -> Option<Tick> {
        self.done_at.get(&host).copied()
    }

    pub fn report(&self, ticks: u64) -> ScenarioReport {
        let hosts = self
            .hosts
            .iter()
            .filter_map(|&id| {
                let h = self.net.host(id)?;
                let c = h.engine().counters();
                let st = h.engine().state();
                Some(HostReport {
                    name: self.net.node_name(id).unwrap_or_default().to_string(),
                    enqueued: c.enqueued,
                    acked: c.acked,
                    data_sent: c.data_sent,
                    retransmits: c.retransmits,
                    data_received: c.data_received,
                    window_size: st.window_size(),
                    timeout: st.timeout(),
                    done_tick: self.done_at(id).map(|t| t.0),
                })
            })
            .collect();
        ScenarioReport {
            ticks,
            hosts,
            stats: self.net.stats,
        }
    }
}

impl World for ScenarioWorld {
    fn step(&mut self, now: Tick) -> Result<()> {
        self.inject_due_flows(now)?;
        self.net.step(now)?;
        for &id in &self.hosts {
            if self.done_at.contains_key(&id) {
                continue;
            }
            if self.net.host(id).is_some_and(|h| h.is_done()) {
                info!(host = ?id, %now, "主机数据全部确认");
                self.done_at.insert(id, now);
            }
        }
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.net.is_idle()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostReport {
    pub name: String,
    pub enqueued: u64,
    pub acked: u64,
    pub data_sent: u64,
    pub retransmits: u64,
    pub data_received: u64,
    pub window_size: u32,
    pub timeout: u64,
    pub done_tick: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub ticks: u64,
    pub hosts: Vec<HostReport>,
    pub stats: Stats,
}
