pub mod notify;
pub mod poll;
pub mod tracker;

pub use notify::{DesktopNotifier, SilentSink};
pub use tracker::{NotificationSink, PodStatusTracker};
