//! kubectl process invocation and output scraping.

pub mod table;

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Thin wrapper around the kubectl binary.
///
/// All cluster state comes from kubectl's plain-text table output; nothing
/// here talks to the API server directly.
#[derive(Debug, Clone)]
pub struct Kubectl {
    bin: String,
}

impl Kubectl {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    fn capture(&self, args: &[&str]) -> Result<String> {
        debug!("running {} {}", self.bin, args.join(" "));
        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute {}", self.bin))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} {}: {}", self.bin, args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Names of all namespaces visible to the current context.
    pub fn namespaces(&self) -> Result<Vec<String>> {
        Ok(first_column(&self.capture(&["get", "namespaces"])?))
    }

    /// Pod names in one namespace.
    pub fn pod_names(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(first_column(&self.capture(&["-n", namespace, "get", "pods"])?))
    }

    /// Raw `get` output for a resource type, table text as kubectl prints it.
    pub fn get_table(&self, namespace: &str, resource: &str) -> Result<String> {
        self.capture(&["-n", namespace, "get", resource])
    }

    /// Async pod listing for the watch loop.
    pub async fn pods_raw(&self, namespace: &str) -> Result<String> {
        let output = tokio::process::Command::new(&self.bin)
            .args(["-n", namespace, "get", "pods"])
            .output()
            .await
            .with_context(|| format!("failed to execute {}", self.bin))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} get pods: {}", self.bin, stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Attach an interactive shell to a pod. The remote shell's exit status
    /// is not an error; only a failure to spawn kubectl is.
    pub fn exec_shell(&self, namespace: &str, pod: &str) -> Result<()> {
        Command::new(&self.bin)
            .args(["-n", namespace, "exec", "-it", pod, "--", "bash"])
            .status()
            .with_context(|| format!("failed to execute {}", self.bin))?;
        Ok(())
    }

    /// Print a pod's log history to stdout.
    pub fn print_logs(&self, namespace: &str, pod: &str) -> Result<()> {
        Command::new(&self.bin)
            .args(["-n", namespace, "logs", pod])
            .status()
            .with_context(|| format!("failed to execute {}", self.bin))?;
        Ok(())
    }

    /// Follow a pod's log stream, printing each line to stdout with an
    /// optional prefix. Returns when the stream closes.
    pub async fn follow_logs(
        &self,
        namespace: &str,
        pod: &str,
        prefix: Option<&str>,
    ) -> Result<()> {
        let mut child = tokio::process::Command::new(&self.bin)
            .args(["-n", namespace, "logs", "-f", "--tail=1", pod])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to execute {}", self.bin))?;

        let stdout = child.stdout.take().context("child stdout unavailable")?;
        let stderr = child.stderr.take().context("child stderr unavailable")?;
        let prefix = prefix.unwrap_or("").to_string();

        let out_prefix = prefix.clone();
        let out_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("{}{}", out_prefix, line);
            }
        });
        let err_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("{}{}", prefix, line);
            }
        });

        let _ = tokio::join!(out_task, err_task);
        child
            .wait()
            .await
            .with_context(|| format!("{} logs did not exit cleanly", self.bin))?;
        Ok(())
    }
}

/// First field of every data row, with the NAME header sentinel filtered out.
fn first_column(raw: &str) -> Vec<String> {
    table::parse(raw)
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter(|name| name != "NAME")
        .collect()
}
