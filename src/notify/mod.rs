//! Local notifications for detected button presses.
//!
//! The poll loop decides *what* to announce and *when*; a [`Notifier`]
//! decides how it is rendered (speech, console, log).

mod dispatcher;
mod notifier;

pub use dispatcher::EventDispatcher;
pub use notifier::ConsoleNotifier;

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Structured properties attached to a notification, e.g. `{switch, button}`.
pub type Properties = BTreeMap<String, String>;

/// Sink for announcements.
///
/// Only button presses are announced here. Recoverable connection resets go
/// to the log (`warn`) and [`PollStats::resets`](crate::PollStats) instead,
/// since they can repeat at an unbounded rate.
///
/// Implementations absorb their own failures; a notification never affects
/// the poll loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, properties: &Properties);
}
