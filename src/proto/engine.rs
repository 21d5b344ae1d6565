//! 端点传输引擎
//!
//! 每个 tick 依次执行：
//! 1. 复位本 tick 标志
//! 2. 清空收件箱：DATA 立即回 ACK；ACK 与在途段对账并更新超时
//! 3. 检测超时的在途段
//! 4. 把超时段插回待发送队列队首
//! 5. 询问窗口策略并钳制到 >= 1
//! 6. 仅当没有在途段时，按窗口批量放行新段
//!
//! 第 6 步是“停-批”纪律：整批段全部确认（或超时）之前不会放行任何新段，
//! 吞吐由整批的往返决定，而不是滑动窗口。

use std::collections::HashSet;

use tracing::{debug, trace};

use super::state::{TransportConfig, TransportState};
use crate::net::{NodeId, Segment, SegmentKind};
use crate::policy::{PolicyError, PolicyInput, SizingPolicy};
use crate::queue::BoundedBuffer;
use crate::sim::Tick;

/// 本 tick 的结果标志（每次 `tick` 重新创建）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickFlags {
    pub ack_received: bool,
    pub ack_timed_out: bool,
}

/// 一次 RTT 采样
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RttSample {
    pub seq: u64,
    pub rtt: u64,
}

/// 一次 `tick` 的结果
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub flags: TickFlags,
    /// 本 tick 需要转发给邻居的段：先是 ACK，再是新放行的 DATA
    pub transmit: Vec<Segment>,
    /// 新放行进入在途集合的段数
    pub admitted: usize,
    /// 因超时被放回队首的序号（按在途顺序）
    pub requeued: Vec<u64>,
    /// 本 tick 放行的段中属于重发的序号
    pub retransmitted: Vec<u64>,
    pub rtt_samples: Vec<RttSample>,
    /// 询问策略前的窗口
    pub window_before: u32,
    /// 策略原始输出（未钳制）
    pub proposed_window: i64,
    /// 钳制后的窗口
    pub window_size: u32,
}

/// 端点累计计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCounters {
    pub enqueued: u64,
    pub acked: u64,
    pub data_sent: u64,
    pub retransmits: u64,
    pub acks_sent: u64,
    pub data_received: u64,
}

#[derive(Debug)]
pub struct TransportEngine {
    id: NodeId,
    state: TransportState,
    inbox: BoundedBuffer,
    policy: Box<dyn SizingPolicy>,
    next_seq: u64,
    // 已被超时放回、等待重发的序号
    pending_resend: HashSet<u64>,
    counters: EngineCounters,
}

impl TransportEngine {
    pub fn new(id: NodeId, cfg: TransportConfig, policy: Box<dyn SizingPolicy>) -> Self {
        Self {
            id,
            state: TransportState::new(&cfg),
            inbox: BoundedBuffer::new(cfg.inbox_capacity),
            policy,
            next_seq: 1,
            pending_resend: HashSet::new(),
            counters: EngineCounters::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn inbox(&self) -> &BoundedBuffer {
        &self.inbox
    }

    pub fn counters(&self) -> EngineCounters {
        self.counters
    }

    /// 所有已入队的段都被确认，且收件箱为空
    pub fn is_idle(&self) -> bool {
        self.state.is_idle() && self.inbox.is_empty()
    }

    /// 以下一个序号构造 DATA 段并追加到待发送队列，返回其序号。
    pub fn enqueue_for_send(&mut self, dst: NodeId) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.state.push_outgoing(Segment::data(seq, self.id, dst));
        self.counters.enqueued += 1;
        trace!(node = ?self.id, seq, dst = ?dst, "应用数据入队");
        seq
    }

    /// 邻居交付的段进入收件箱（满则静默丢弃）
    pub fn on_receive(&mut self, seg: Segment) {
        self.inbox.push(seg);
    }

    /// 推进一个 tick。策略失败时直接返回错误，不猜测窗口。
    #[tracing::instrument(skip_all, fields(node = ?self.id, now = %now))]
    pub fn tick(&mut self, now: Tick) -> Result<TickOutcome, PolicyError> {
        let mut flags = TickFlags::default();
        let mut transmit = Vec::new();
        let mut rtt_samples = Vec::new();

        for seg in self.inbox.drain_all() {
            match seg.kind {
                SegmentKind::Data => {
                    self.counters.data_received += 1;
                    transmit.push(seg.ack());
                }
                SegmentKind::Ack => {
                    let m = self.state.acknowledge(seg.seq, now);
                    if let Some(rtt) = m.rtt {
                        rtt_samples.push(RttSample { seq: seg.seq, rtt });
                    }
                    if m.matched() {
                        self.counters.acked += 1;
                        self.pending_resend.remove(&seg.seq);
                    }
                    flags.ack_received = true;
                }
            }
        }
        // ACK 在本 tick 直接发出，不随在途批次一起等待放行
        let acks = transmit.len();

        let requeued: Vec<u64> = self
            .state
            .requeue_expired(now)
            .into_iter()
            .map(|s| s.seq)
            .collect();
        if !requeued.is_empty() {
            flags.ack_timed_out = true;
            self.pending_resend.extend(requeued.iter().copied());
            debug!(?requeued, timeout = self.state.timeout(), "⏰ 在途段超时，放回队首");
        }

        let window_before = self.state.window_size();
        let proposed_window = self.policy.next_window_size(PolicyInput {
            window_size: window_before,
            ack_received: flags.ack_received,
            ack_timed_out: flags.ack_timed_out,
        })?;
        let window_size = self.state.apply_window(proposed_window);

        let admitted = self.state.admit(now);
        let retransmitted: Vec<u64> = admitted
            .iter()
            .filter(|seg| self.pending_resend.remove(&seg.seq))
            .map(|seg| seg.seq)
            .collect();
        self.counters.retransmits += retransmitted.len() as u64;
        let admitted_count = admitted.len();
        transmit.extend(admitted);

        self.counters.acks_sent += acks as u64;
        self.counters.data_sent += admitted_count as u64;

        debug!(
            ack_received = flags.ack_received,
            ack_timed_out = flags.ack_timed_out,
            window_before,
            proposed_window,
            window_size,
            admitted = admitted_count,
            in_flight = self.state.in_flight().len(),
            queued = self.state.outgoing().len(),
            "tick 完成"
        );

        Ok(TickOutcome {
            flags,
            transmit,
            admitted: admitted_count,
            requeued,
            retransmitted,
            rtt_samples,
            window_before,
            proposed_window,
            window_size,
        })
    }
}
