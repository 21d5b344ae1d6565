//! 定长缓冲区（尾丢弃）
//!
//! 当缓冲区已满时，直接丢弃新到达的数据段，不返回错误也不通知发送方。

use std::collections::VecDeque;

use tracing::trace;

use crate::net::Segment;

#[derive(Debug, Clone)]
pub struct BoundedBuffer {
    capacity: usize,
    dropped: u64,
    q: VecDeque<Segment>,
}

impl BoundedBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            dropped: 0,
            q: VecDeque::with_capacity(capacity),
        }
    }

    /// 入队：未满则追加到队尾，否则静默丢弃
    pub fn push(&mut self, seg: Segment) {
        if self.q.len() >= self.capacity {
            self.dropped = self.dropped.saturating_add(1);
            trace!(seq = seg.seq, kind = ?seg.kind, capacity = self.capacity, "缓冲区已满，丢弃");
            return;
        }
        self.q.push_back(seg);
    }

    /// 取出并清空全部内容（按到达顺序）
    pub fn drain_all(&mut self) -> Vec<Segment> {
        self.q.drain(..).collect()
    }

    /// 按到达顺序取出至多 `n` 个
    pub fn drain_up_to(&mut self, n: usize) -> Vec<Segment> {
        let n = n.min(self.q.len());
        self.q.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 累计丢弃数（仅用于统计）
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
