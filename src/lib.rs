pub mod error;
pub mod net;
pub mod policy;
pub mod proto;
pub mod queue;
pub mod sim;
pub mod topo;
pub mod viz;

#[cfg(test)]
mod test;
