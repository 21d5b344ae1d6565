//! 统计信息
//!
//! 定义网络仿真统计数据结构。

use serde::{Deserialize, Serialize};

/// 网络统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// 主机放行的 DATA 段（含重发）
    pub data_sent: u64,
    /// 主机回的 ACK
    pub acks_sent: u64,
    pub retransmits: u64,
    /// 出现超时重排的 (主机, tick) 次数
    pub timeout_ticks: u64,
    /// 成功进入某个收件箱的段
    pub delivered: u64,
    /// 因收件箱已满被丢弃的段
    pub dropped: u64,
    /// 路由器找不到下一跳而丢弃的段
    pub unroutable: u64,
}
