//! 拓扑构建

pub mod dumbbell;
pub mod star;
