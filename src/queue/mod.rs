//! 队列策略（Queue disciplines）
//!
//! 所有节点的收件箱都是按数据段个数计容量的尾丢弃缓冲区。

mod bounded;

pub use bounded::BoundedBuffer;

/// 主机收件箱的默认容量（数据段个数）
pub const DEFAULT_INBOX_CAPACITY: usize = 5;
