use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kubepick::app::Config;
use kubepick::kubectl::Kubectl;
use kubepick::prompt::PromptSession;
use kubepick::ui;
use kubepick::watch::{self, DesktopNotifier, NotificationSink, PodStatusTracker, SilentSink};

/// kubepick - interactive kubectl front-end
///
/// Pick a namespace, an operation and a target through fuzzy-matched
/// prompts instead of memorizing flags.
#[derive(Parser)]
#[command(name = "kubepick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pre-answers for the prompts, in order (fuzzy-matched)
    args: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// kubectl binary to invoke
    #[arg(long)]
    kubectl: Option<String>,

    /// Pod watch poll interval in milliseconds
    #[arg(long)]
    interval: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Get,
    Exec,
    LogHistory,
    LogFollow,
    LogFollowMulti,
    WatchPods,
}

impl Operation {
    const ALL: [Operation; 6] = [
        Operation::Get,
        Operation::Exec,
        Operation::LogHistory,
        Operation::LogFollow,
        Operation::LogFollowMulti,
        Operation::WatchPods,
    ];

    fn label(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Exec => "exec",
            Operation::LogHistory => "log (history only)",
            Operation::LogFollow => "log (future only)",
            Operation::LogFollowMulti => "log (future only, multiple pods)",
            Operation::WatchPods => "watch pods",
        }
    }

    fn from_label(label: &str) -> Option<Operation> {
        Operation::ALL.iter().copied().find(|op| op.label() == label)
    }
}

/// Resource types offered by the `get` operation.
const RESOURCE_TYPES: &[&str] = &[
    "all",
    "deployments",
    "endpoints",
    "events",
    "jobs",
    "namespaces",
    "nodes",
    "pods",
    "replicasets",
    "services",
    "statefulsets",
    "storageclasses",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let mut config = Config::load().unwrap_or_default();
    if let Some(bin) = cli.kubectl {
        config.kubectl_bin = bin;
    }
    if let Some(ms) = cli.interval {
        config.watch.poll_interval_ms = ms;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let kubectl = Kubectl::new(config.kubectl_bin.clone());
    let mut session = PromptSession::new(cli.args);

    run(&runtime, &kubectl, &mut config, &mut session)
}

fn init_logging(level: &str) -> Result<()> {
    let log_dir = directories::ProjectDirs::from("", "", "kubepick")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("kubepick"));

    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("kubepick.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(log_file))
        .init();

    info!("kubepick starting");
    Ok(())
}

fn run(
    runtime: &tokio::runtime::Runtime,
    kubectl: &Kubectl,
    config: &mut Config,
    session: &mut PromptSession,
) -> Result<()> {
    let namespaces = kubectl
        .namespaces()
        .context("failed to list namespaces; is the cluster reachable?")?;
    if namespaces.is_empty() {
        anyhow::bail!("no namespaces visible to the current context");
    }

    let Some(namespace) = session.ask(
        "Select a namespace:",
        &namespaces,
        config.last.namespace.as_deref(),
    )?
    else {
        return Ok(());
    };
    if let Err(e) = config.remember_namespace(&namespace) {
        warn!("failed to save config: {}", e);
    }

    let labels: Vec<String> = Operation::ALL
        .iter()
        .map(|op| op.label().to_string())
        .collect();
    let Some(op_label) = session.ask(
        "What do you want to do?",
        &labels,
        config.last.operation.as_deref(),
    )?
    else {
        return Ok(());
    };
    if let Err(e) = config.remember_operation(&op_label) {
        warn!("failed to save config: {}", e);
    }
    let operation = Operation::from_label(&op_label).context("unknown operation")?;
    info!("operation {} in namespace {}", op_label, namespace);

    match operation {
        Operation::Get => {
            let types: Vec<String> = RESOURCE_TYPES.iter().map(|t| t.to_string()).collect();
            let Some(resource) = session.ask(
                "Select a resource type:",
                &types,
                config.last.resource_type.as_deref(),
            )?
            else {
                return Ok(());
            };
            if let Err(e) = config.remember_resource_type(&resource) {
                warn!("failed to save config: {}", e);
            }
            let output = kubectl.get_table(&namespace, &resource)?;
            println!("{}", output.trim_end());
        }
        Operation::Exec => {
            let Some(pod) = select_pod(session, kubectl, &namespace)? else {
                return Ok(());
            };
            kubectl.exec_shell(&namespace, &pod)?;
        }
        Operation::LogHistory => {
            let Some(pod) = select_pod(session, kubectl, &namespace)? else {
                return Ok(());
            };
            kubectl.print_logs(&namespace, &pod)?;
        }
        Operation::LogFollow => {
            let Some(pod) = select_pod(session, kubectl, &namespace)? else {
                return Ok(());
            };
            runtime.block_on(kubectl.follow_logs(&namespace, &pod, None))?;
        }
        Operation::LogFollowMulti => {
            let pods = kubectl.pod_names(&namespace)?;
            if pods.is_empty() {
                println!("No pods in namespace {}", namespace);
                return Ok(());
            }
            let picked = session.ask_many("Select pods:", &pods)?;
            if picked.is_empty() {
                return Ok(());
            }
            runtime.block_on(follow_all(kubectl, &namespace, picked))?;
        }
        Operation::WatchPods => run_watch(runtime, kubectl, config, &namespace)?,
    }

    Ok(())
}

fn select_pod(
    session: &mut PromptSession,
    kubectl: &Kubectl,
    namespace: &str,
) -> Result<Option<String>> {
    let pods = kubectl.pod_names(namespace)?;
    if pods.is_empty() {
        println!("No pods in namespace {}", namespace);
        return Ok(None);
    }
    session.ask("Select a pod:", &pods, None)
}

async fn follow_all(kubectl: &Kubectl, namespace: &str, pods: Vec<String>) -> Result<()> {
    let mut tasks = tokio::task::JoinSet::new();
    for pod in pods {
        let kubectl = kubectl.clone();
        let namespace = namespace.to_string();
        tasks.spawn(async move {
            let prefix = format!("[{}] ", pod);
            if let Err(e) = kubectl
                .follow_logs(&namespace, &pod, Some(prefix.as_str()))
                .await
            {
                warn!("log stream for {} ended: {}", pod, e);
            }
        });
    }
    while tasks.join_next().await.is_some() {}
    Ok(())
}

fn run_watch(
    runtime: &tokio::runtime::Runtime,
    kubectl: &Kubectl,
    config: &Config,
    namespace: &str,
) -> Result<()> {
    let sink: Box<dyn NotificationSink + Send> = if config.watch.notifications {
        Box::new(DesktopNotifier)
    } else {
        Box::new(SilentSink)
    };
    let mut tracker = PodStatusTracker::new(namespace, sink);
    let interval = Duration::from_millis(config.watch.poll_interval_ms.max(100));
    info!("watching pods in {} every {:?}", namespace, interval);

    ui::with_terminal(|terminal| {
        runtime.block_on(watch::poll::run(terminal, kubectl, &mut tracker, interval))
    })
}
