#![forbid(unsafe_code)]

//! Sensors that publish readings and controllers that react to them.
//!
//! Sensors hold a clone of the channel they publish on. Controllers register
//! through a [`SubscriptionManager`] and never keep a handle themselves, so
//! their lifetime on the bus is exactly the manager's lifetime.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use evchan::{Channel, SubscriptionManager};
use tracing::{debug, info, warn};

use crate::events::{DoorStatusEvent, EventContext, TemperatureEvent};

/// Something a controller decided to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Cooling { temperature: f64 },
    Heating { temperature: f64 },
    DoorAlert { sensor_id: i32 },
    DoorOk { sensor_id: i32 },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cooling { temperature } => {
                write!(f, "Activating cooling system ({temperature}°C)")
            }
            Self::Heating { temperature } => {
                write!(f, "Activating heating system ({temperature}°C)")
            }
            Self::DoorAlert { sensor_id } => {
                write!(f, "ALERT: Door {sensor_id} opened unexpectedly!")
            }
            Self::DoorOk { sensor_id } => write!(f, "Door status ok {sensor_id}"),
        }
    }
}

/// Shared, append-only record of controller actions.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Rc<RefCell<Vec<Action>>>,
}

impl ActionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, action: Action) {
        self.entries.borrow_mut().push(action);
    }

    /// Copy of everything recorded so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Action> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Publishes temperature readings.
#[derive(Debug, Clone)]
pub struct TemperatureSensor {
    channel: Channel<TemperatureEvent>,
}

impl TemperatureSensor {
    #[must_use]
    pub fn new(context: &EventContext) -> Self {
        Self {
            channel: context.temperature.clone(),
        }
    }

    /// Publish a reading; returns how many subscribers received it.
    pub fn update(&self, value: f64) -> usize {
        self.channel.publish(TemperatureEvent { value })
    }
}

/// Publishes door open/closed transitions.
#[derive(Debug, Clone)]
pub struct DoorMonitor {
    channel: Channel<DoorStatusEvent>,
}

impl DoorMonitor {
    #[must_use]
    pub fn new(context: &EventContext) -> Self {
        Self {
            channel: context.door_status.clone(),
        }
    }

    /// Publish a door state; returns how many subscribers received it.
    pub fn check_door(&self, sensor_id: i32, is_open: bool) -> usize {
        self.channel.publish(DoorStatusEvent { is_open, sensor_id })
    }
}

/// Temperature band outside of which the climate controller acts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateThresholds {
    /// Readings strictly above this start cooling.
    pub cooling_above: f64,
    /// Readings strictly below this start heating.
    pub heating_below: f64,
}

impl Default for ClimateThresholds {
    fn default() -> Self {
        Self {
            cooling_above: 25.0,
            heating_below: 18.0,
        }
    }
}

impl ClimateThresholds {
    #[must_use]
    pub fn respond(&self, temperature: f64) -> Option<Action> {
        if temperature > self.cooling_above {
            Some(Action::Cooling { temperature })
        } else if temperature < self.heating_below {
            Some(Action::Heating { temperature })
        } else {
            None
        }
    }
}

/// Turns heating or cooling on in response to temperature readings.
#[derive(Debug, Clone, Copy)]
pub struct ClimateController {
    thresholds: ClimateThresholds,
}

impl ClimateController {
    /// Subscribe to `context.temperature` through `manager`.
    pub fn attach(
        manager: &mut SubscriptionManager,
        context: &EventContext,
        thresholds: ClimateThresholds,
        log: ActionLog,
    ) -> Self {
        manager.subscribe(
            &context.temperature,
            move |event: &TemperatureEvent| {
                debug!(temperature = event.value, "climate control received temperature");
                if let Some(action) = thresholds.respond(event.value) {
                    info!(%action, "climate control");
                    log.record(action);
                }
            },
            "climate_controller",
        );
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> ClimateThresholds {
        self.thresholds
    }
}

/// Raises an alert whenever a door reports open.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecuritySystem;

impl SecuritySystem {
    /// Subscribe to `context.door_status` through `manager`.
    pub fn attach(manager: &mut SubscriptionManager, context: &EventContext, log: ActionLog) -> Self {
        manager.subscribe(
            &context.door_status,
            move |event: &DoorStatusEvent| {
                let action = Self::respond(event);
                match action {
                    Action::DoorAlert { sensor_id } => warn!(sensor_id, "door opened unexpectedly"),
                    _ => debug!(sensor_id = event.sensor_id, "door status ok"),
                }
                log.record(action);
            },
            "security_system",
        );
        Self
    }

    #[must_use]
    pub fn respond(event: &DoorStatusEvent) -> Action {
        if event.is_open {
            Action::DoorAlert {
                sensor_id: event.sensor_id,
            }
        } else {
            Action::DoorOk {
                sensor_id: event.sensor_id,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_band() {
        let t = ClimateThresholds::default();
        assert_eq!(t.respond(22.5), None);
        assert_eq!(t.respond(25.0), None);
        assert_eq!(t.respond(18.0), None);
        assert_eq!(t.respond(27.3), Some(Action::Cooling { temperature: 27.3 }));
        assert_eq!(t.respond(10.0), Some(Action::Heating { temperature: 10.0 }));
    }

    #[test]
    fn custom_thresholds() {
        let ctx = EventContext::new();
        let log = ActionLog::new();
        let mut manager = SubscriptionManager::new();
        let thresholds = ClimateThresholds {
            cooling_above: 30.0,
            heating_below: 5.0,
        };
        let climate = ClimateController::attach(&mut manager, &ctx, thresholds, log.clone());
        assert_eq!(climate.thresholds(), thresholds);

        let sensor = TemperatureSensor::new(&ctx);
        assert_eq!(sensor.update(27.3), 1);
        assert!(log.is_empty());
        sensor.update(31.0);
        assert_eq!(log.entries(), vec![Action::Cooling { temperature: 31.0 }]);
    }

    #[test]
    fn security_response() {
        let open = DoorStatusEvent {
            is_open: true,
            sensor_id: 4,
        };
        let closed = DoorStatusEvent {
            is_open: false,
            sensor_id: 5,
        };
        assert_eq!(SecuritySystem::respond(&open), Action::DoorAlert { sensor_id: 4 });
        assert_eq!(SecuritySystem::respond(&closed), Action::DoorOk { sensor_id: 5 });
    }

    #[test]
    fn action_display() {
        assert_eq!(
            Action::DoorAlert { sensor_id: 2 }.to_string(),
            "ALERT: Door 2 opened unexpectedly!"
        );
        assert_eq!(Action::DoorOk { sensor_id: 1 }.to_string(), "Door status ok 1");
        assert_eq!(
            Action::Cooling { temperature: 27.3 }.to_string(),
            "Activating cooling system (27.3°C)"
        );
    }

    #[test]
    fn publish_without_controllers_reaches_nobody() {
        let ctx = EventContext::new();
        assert_eq!(TemperatureSensor::new(&ctx).update(40.0), 0);
        assert_eq!(DoorMonitor::new(&ctx).check_door(9, true), 0);
    }
}
