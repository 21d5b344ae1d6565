//! Dumbbell 拓扑窗口策略实验
//!
//! h0 -> h1 单流：h0 在 t0 一次性入队若干 DATA 段，按所选窗口策略发送，
//! 运行到全部确认或达到 tick 上限。

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tcpml_sim::error::Result as SimResult;
use tcpml_sim::net::{Network, NodeId, RouterConfig};
use tcpml_sim::policy::PolicySpec;
use tcpml_sim::proto::TransportConfig;
use tcpml_sim::sim::{Stepper, Tick, World};
use tcpml_sim::topo::dumbbell::{DumbbellOpts, build_dumbbell};
use tcpml_sim::viz::VizLogger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    Constant,
    Aimd,
    Linear,
}

#[derive(Debug, Parser)]
#[command(name = "dumbbell-ml", about = "Dumbbell 拓扑仿真：h0->h1 单流，窗口由可插拔策略决定")]
struct Args {
    /// 要发送的 DATA 段数
    #[arg(long, default_value_t = 100)]
    segments: u64,

    /// 最多运行多少个 tick
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    #[arg(long, value_enum, default_value_t = PolicyKind::Aimd)]
    policy: PolicyKind,

    /// constant 策略的窗口
    #[arg(long, default_value_t = 4)]
    window: u32,

    /// aimd：每个 ACK tick 的加性增量
    #[arg(long, default_value_t = 1)]
    increase: u32,

    /// aimd：超时 tick 的乘性因子
    #[arg(long, default_value_t = 0.5)]
    decrease_factor: f64,

    /// aimd：窗口上限
    #[arg(long)]
    max_window: Option<u32>,

    /// linear：系数，依次为 window、ack、timeout、intercept
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [1.0, 1.0, -5.0, 0.0])]
    coef: Vec<f64>,

    /// 初始超时（tick）
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// 主机收件箱容量（段）
    #[arg(long, default_value_t = 5)]
    inbox_cap: usize,

    /// 路由器收件箱容量（段）
    #[arg(long, default_value_t = 16)]
    router_cap: usize,

    /// 瓶颈 r0->r1 每 tick 转发段数；不填则不限
    #[arg(long)]
    bottleneck_rate: Option<usize>,

    /// 输出 JSON 事件文件；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,
}

impl Args {
    fn policy_spec(&self) -> Result<PolicySpec, String> {
        Ok(match self.policy {
            PolicyKind::Constant => PolicySpec::Constant {
                window: self.window,
            },
            PolicyKind::Aimd => PolicySpec::Aimd {
                increase: self.increase,
                decrease_factor: self.decrease_factor,
                max_window: self.max_window,
            },
            PolicyKind::Linear => {
                let &[window_coef, ack_coef, timeout_coef, intercept] = self.coef.as_slice() else {
                    return Err(format!("--coef expects 4 values, got {}", self.coef.len()));
                };
                PolicySpec::Linear {
                    window_coef,
                    ack_coef,
                    timeout_coef,
                    intercept,
                }
            }
        })
    }
}

/// 在网络之上记录 h0 全部确认的 tick
struct DumbbellRun {
    net: Network,
    h0: NodeId,
    done_at: Option<Tick>,
}

impl World for DumbbellRun {
    fn step(&mut self, now: Tick) -> SimResult<()> {
        self.net.step(now)?;
        if self.done_at.is_none() && self.net.host(self.h0).is_some_and(|h| h.is_done()) {
            self.done_at = Some(now);
        }
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.net.is_idle()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let opts = DumbbellOpts {
        transport: TransportConfig {
            initial_window: 1,
            initial_timeout: args.timeout,
            inbox_capacity: args.inbox_cap,
        },
        policy: args.policy_spec()?,
        router: RouterConfig {
            capacity: args.router_cap,
            rate: None,
        },
        bottleneck_rate: args.bottleneck_rate,
    };

    let mut net = Network::default();
    let topo = build_dumbbell(&mut net, &opts)?;

    if args.viz_json.is_some() {
        net.viz = Some(VizLogger::default());
        net.emit_viz_meta();
    }

    for _ in 0..args.segments {
        net.enqueue_for_send(topo.h0, topo.h1)?;
    }

    let mut run = DumbbellRun {
        net,
        h0: topo.h0,
        done_at: None,
    };
    let mut stepper = Stepper::default();
    stepper.run_until_idle(args.ticks, &mut run)?;
    let DumbbellRun { mut net, done_at, .. } = run;

    if let Some(path) = &args.viz_json {
        if let Some(v) = net.viz.take() {
            let json = serde_json::to_string_pretty(&v.events)?;
            fs::write(path, json)?;
            eprintln!("wrote viz events to {}", path.display());
        }
    }

    let h0 = net.host(topo.h0).ok_or("h0 missing")?;
    let c = h0.engine().counters();
    let st = h0.engine().state();
    let done_tick = done_at.map_or_else(|| "-".to_string(), |t| t.0.to_string());

    println!(
        "done @ {}\n  h0: acked={}, enqueued={}, finished={}, done_tick={}, data_sent={}, retransmits={}, window={}, timeout={}\n  net: delivered={}, dropped={}, unroutable={}, timeout_ticks={}",
        stepper.now(),
        c.acked,
        c.enqueued,
        h0.is_done(),
        done_tick,
        c.data_sent,
        c.retransmits,
        st.window_size(),
        st.timeout(),
        net.stats.delivered,
        net.stats.dropped,
        net.stats.unroutable,
        net.stats.timeout_ticks,
    );
    Ok(())
}
