//! 每个端点的传输状态
//!
//! 只保存跨 tick 存活的数据：待发送队列、在途集合、窗口与超时。
//! 本 tick 的 ACK/超时标志是 `tick` 内的局部值，不在这里持久化。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::net::Segment;
use crate::queue::DEFAULT_INBOX_CAPACITY;
use crate::sim::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// 初始窗口（数据段个数，至少为 1）
    pub initial_window: u32,
    /// 初始超时（tick）
    pub initial_timeout: u64,
    /// 收件箱容量（数据段个数）
    pub inbox_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            initial_window: 1,
            initial_timeout: 10,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

/// 一个已发送、尚未确认的数据段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub segment: Segment,
    pub sent_at: Tick,
}

/// 一次 ACK 对账的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckMatch {
    /// 命中在途段时得到的往返时间
    pub rtt: Option<u64>,
    /// 是否从待发送队列中移除了同序号的段
    pub dequeued: bool,
}

impl AckMatch {
    pub fn matched(&self) -> bool {
        self.rtt.is_some() || self.dequeued
    }
}

#[derive(Debug, Clone)]
pub struct TransportState {
    outgoing: VecDeque<Segment>,
    in_flight: Vec<InFlight>,
    window_size: u32,
    timeout: u64,
}

impl TransportState {
    pub fn new(cfg: &TransportConfig) -> Self {
        Self {
            outgoing: VecDeque::new(),
            in_flight: Vec::new(),
            window_size: cfg.initial_window.max(1),
            timeout: cfg.initial_timeout,
        }
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn outgoing(&self) -> &VecDeque<Segment> {
        &self.outgoing
    }

    pub fn in_flight(&self) -> &[InFlight] {
        &self.in_flight
    }

    pub fn outgoing_seqs(&self) -> Vec<u64> {
        self.outgoing.iter().map(|s| s.seq).collect()
    }

    pub fn in_flight_seqs(&self) -> Vec<u64> {
        self.in_flight.iter().map(|f| f.segment.seq).collect()
    }

    /// 待发送队列与在途集合是否都为空
    pub fn is_idle(&self) -> bool {
        self.outgoing.is_empty() && self.in_flight.is_empty()
    }

    pub fn push_outgoing(&mut self, seg: Segment) {
        self.outgoing.push_back(seg);
    }

    /// 用一个 ACK 对账：移除同序号的在途段（并以其 RTT 作为新超时），
    /// 同时移除仍在待发送队列中的同序号段。
    pub fn acknowledge(&mut self, seq: u64, now: Tick) -> AckMatch {
        let mut m = AckMatch::default();

        if let Some(pos) = self.in_flight.iter().position(|f| f.segment.seq == seq) {
            let entry = self.in_flight.remove(pos);
            let rtt = now.since(entry.sent_at);
            self.timeout = rtt;
            m.rtt = Some(rtt);
        }

        if let Some(pos) = self.outgoing.iter().position(|s| s.seq == seq) {
            self.outgoing.remove(pos);
            m.dequeued = true;
        }

        trace!(seq, rtt = ?m.rtt, dequeued = m.dequeued, timeout = self.timeout, "ACK 对账");
        m
    }

    /// 把超时的在途段放回待发送队列队首。
    ///
    /// 按在途顺序逐个插到队首，所以越靠后发现的越靠前：在途 [5, 7, 9]
    /// 全部超时后，队首依次为 [9, 7, 5]。返回被重排的段（按在途顺序）。
    pub fn requeue_expired(&mut self, now: Tick) -> Vec<Segment> {
        let timeout = self.timeout;
        let (expired, kept): (Vec<InFlight>, Vec<InFlight>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|f| now.since(f.sent_at) > timeout);
        self.in_flight = kept;

        for f in &expired {
            self.outgoing.push_front(f.segment);
        }
        expired.into_iter().map(|f| f.segment).collect()
    }

    /// 采用策略给出的窗口，钳制到 [1, u32::MAX]
    pub fn apply_window(&mut self, proposed: i64) -> u32 {
        self.window_size = proposed.clamp(1, u32::MAX as i64) as u32;
        self.window_size
    }

    /// 仅当在途集合为空时，从队首取出至多 `window_size` 个段放入在途集合。
    pub fn admit(&mut self, now: Tick) -> Vec<Segment> {
        if !self.in_flight.is_empty() {
            return Vec::new();
        }
        let n = (self.window_size as usize).min(self.outgoing.len());
        let batch: Vec<Segment> = self.outgoing.drain(..n).collect();
        self.in_flight.extend(batch.iter().map(|&segment| InFlight {
            segment,
            sent_at: now,
        }));
        batch
    }
}
