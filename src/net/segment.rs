//! 数据段类型
//!
//! 定义仿真中流动的最小流量单元：DATA 段与 ACK 段。

use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// 数据段种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Data,
    Ack,
}

/// 一个数据段（创建后不可变）。
///
/// ACK 段的 `seq` 等于它所确认的 DATA 段的 `seq`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub seq: u64,
    pub src: NodeId,
    pub dst: NodeId,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn data(seq: u64, src: NodeId, dst: NodeId) -> Self {
        Self {
            seq,
            src,
            dst,
            kind: SegmentKind::Data,
        }
    }

    /// 为当前 DATA 段构造回给发送方的 ACK
    pub fn ack(&self) -> Self {
        Self {
            seq: self.seq,
            src: self.dst,
            dst: self.src,
            kind: SegmentKind::Ack,
        }
    }

    pub fn is_data(&self) -> bool {
        self.kind == SegmentKind::Data
    }

    pub fn is_ack(&self) -> bool {
        self.kind == SegmentKind::Ack
    }
}
