//! Desktop notification delivery.

use std::process::Command;
use tracing::debug;

use super::tracker::NotificationSink;

/// Sends transition notifications through the platform notifier command:
/// `osascript` on macOS, `notify-send` everywhere else.
///
/// Delivery is best effort. A missing notifier or a non-zero exit is logged
/// and dropped; the watch loop never sees it.
pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn notify(&self, title: &str, subtitle: &str, message: &str) {
        let result = if cfg!(target_os = "macos") {
            let script = format!(
                "display notification {} with title {} subtitle {}",
                osascript_string(message),
                osascript_string(title),
                osascript_string(subtitle),
            );
            Command::new("osascript").arg("-e").arg(script).output()
        } else {
            Command::new("notify-send")
                .arg(format!("{}: {}", title, subtitle))
                .arg(message)
                .output()
        };

        match result {
            Ok(output) if !output.status.success() => {
                debug!("notifier exited with {}", output.status);
            }
            Err(e) => debug!("failed to spawn notifier: {}", e),
            Ok(_) => {}
        }
    }
}

/// Sink that drops every notification (notifications disabled in config).
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify(&self, _title: &str, _subtitle: &str, _message: &str) {}
}

/// Quote a string for embedding in an AppleScript source line.
fn osascript_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
