#![forbid(unsafe_code)]

//! Event payloads and the context that owns their channels.

use evchan::{Channel, ChannelConfig};

/// A temperature reading in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureEvent {
    pub value: f64,
}

/// Open/closed state reported by one door sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorStatusEvent {
    pub is_open: bool,
    pub sensor_id: i32,
}

/// Application-level owner of every channel.
///
/// Producers and consumers receive a reference to the context instead of
/// reaching for globals. The context must outlive the subscriptions made
/// against it; a manager created after the context satisfies that by scope.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub temperature: Channel<TemperatureEvent>,
    pub door_status: Channel<DoorStatusEvent>,
}

impl Default for EventContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EventContext {
    /// Create both channels without per-publish tracing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dispatch_logging(false)
    }

    /// Create both channels, optionally tracing every publish.
    #[must_use]
    pub fn with_dispatch_logging(enabled: bool) -> Self {
        let config = ChannelConfig::default().with_log_dispatch(enabled);
        Self {
            temperature: Channel::with_config(config.clone().with_name("temperature")),
            door_status: Channel::with_config(config.with_name("door_status")),
        }
    }

    /// Total callbacks registered across all channels.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.temperature.subscriber_count() + self.door_status.subscriber_count()
    }
}
