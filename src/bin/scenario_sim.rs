//! 场景仿真
//!
//! 从 JSON 读取 star 拓扑场景（主机、路由器、策略、流量），运行并输出每台主机的结果。

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tcpml_sim::sim::{ScenarioSpec, Stepper};
use tcpml_sim::viz::VizLogger;

#[derive(Debug, Parser)]
#[command(name = "scenario-sim", about = "按 JSON 场景运行 star 拓扑仿真")]
struct Args {
    /// 场景文件（JSON）
    #[arg(long)]
    scenario: PathBuf,

    /// 覆盖场景中的 tick 上限
    #[arg(long)]
    ticks: Option<u64>,

    /// 输出 JSON 事件文件；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,

    /// 输出 JSON 汇总报告；不填则只打印文本
    #[arg(long)]
    report_json: Option<PathBuf>,
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
    let raw = fs::read_to_string(&args.scenario)?;
    let spec = ScenarioSpec::from_json(&raw)?;
    let mut world = spec.build()?;

    if args.viz_json.is_some() {
        world.net.viz = Some(VizLogger::default());
        world.net.emit_viz_meta();
    }

    let ticks = args.ticks.unwrap_or(spec.ticks);
    let mut stepper = Stepper::default();
    let stepped = if spec.stop_when_idle {
        stepper.run_until_idle(ticks, &mut world)?
    } else {
        stepper.run_for(ticks, &mut world)?;
        ticks
    };

    if let Some(path) = &args.viz_json {
        if let Some(v) = world.net.viz.take() {
            fs::write(path, serde_json::to_string_pretty(&v.events)?)?;
            eprintln!("wrote viz events to {}", path.display());
        }
    }

    let report = world.report(stepped);
    for h in &report.hosts {
        println!(
            "host {} enqueued={} acked={} data_sent={} retransmits={} data_received={} window={} timeout={} done_tick={}",
            h.name,
            h.enqueued,
            h.acked,
            h.data_sent,
            h.retransmits,
            h.data_received,
            h.window_size,
            h.timeout,
            h.done_tick.map_or_else(|| "-".to_string(), |t| t.to_string()),
        );
    }
    let s = &report.stats;
    println!(
        "net ticks={} data_sent={} acks_sent={} retransmits={} delivered={} dropped={} unroutable={}",
        report.ticks, s.data_sent, s.acks_sent, s.retransmits, s.delivered, s.dropped, s.unroutable
    );

    if let Some(path) = &args.report_json {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    Ok(())
}
