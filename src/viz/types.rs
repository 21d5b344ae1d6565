use serde::{Deserialize, Serialize};

use crate::net::SegmentKind;

/// 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 拓扑元信息（建议作为 t=0 的第一条事件）
    Meta {
        nodes: Vec<VizNodeInfo>,
        links: Vec<VizLinkInfo>,
    },
    /// 主机放行一个 DATA 段
    SendData { node: usize, dst: usize, seq: u64, retrans: bool },
    /// 主机回 ACK
    SendAck { node: usize, dst: usize, seq: u64 },
    /// 主机收到命中在途段的 ACK
    RecvAck { node: usize, seq: u64, rtt: u64 },
    /// 超时段被放回队首（按在途顺序）
    Requeue { node: usize, seqs: Vec<u64> },
    /// 一次窗口策略调用
    Window {
        node: usize,
        window_size: u32,
        ack_received: bool,
        ack_timed_out: bool,
        next_window: u32,
    },
    /// 收件箱已满，尾丢弃
    Drop { node: usize, seq: u64, seg_kind: SegmentKind },
    /// 路由器找不到下一跳
    Unroutable { node: usize, seq: u64, dst: usize },
}

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizNodeKind {
    Host,
    Router,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizNodeInfo {
    pub id: usize,
    pub name: String,
    pub kind: VizNodeKind,
    /// 收件箱容量（数据段个数）
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizLinkInfo {
    pub a: usize,
    pub b: usize,
}

/// 一条事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 一次策略调用的输入与输出，即拟合窗口策略所用的一行样本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSample {
    pub window_size: u32,
    pub ack_received: bool,
    pub ack_timed_out: bool,
    pub next_window: u32,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, tick: u64, kind: VizEventKind) {
        self.events.push(VizEvent { tick, kind });
    }

    /// 提取所有节点的窗口策略样本（按时间顺序）
    pub fn window_samples(&self) -> Vec<WindowSample> {
        self.events
            .iter()
            .filter_map(|ev| match ev.kind {
                VizEventKind::Window {
                    window_size,
                    ack_received,
                    ack_timed_out,
                    next_window,
                    ..
                } => Some(WindowSample {
                    window_size,
                    ack_received,
                    ack_timed_out,
                    next_window,
                }),
                _ => None,
            })
            .collect()
    }
}
