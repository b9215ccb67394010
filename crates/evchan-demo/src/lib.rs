#![forbid(unsafe_code)]

//! Sensor and controller demo for evchan.
//!
//! # Overview
//!
//! Two producers ([`TemperatureSensor`](devices::TemperatureSensor),
//! [`DoorMonitor`](devices::DoorMonitor)) publish on channels owned by an
//! [`EventContext`](events::EventContext). Two consumers
//! ([`ClimateController`](devices::ClimateController),
//! [`SecuritySystem`](devices::SecuritySystem)) register through one
//! [`SubscriptionManager`] and record what they decide into an
//! [`ActionLog`](devices::ActionLog).
//!
//! The crate only uses the public surface of `evchan`.

pub mod cli;
pub mod devices;
pub mod events;
pub mod logging;

use evchan::SubscriptionManager;
use tracing::info;

use devices::{
    ActionLog, ClimateController, ClimateThresholds, DoorMonitor, SecuritySystem,
    TemperatureSensor,
};
use events::EventContext;

/// Run the fixed demo sequence against `context` and return what happened.
///
/// Two temperature readings (22.5, 27.3) and two door reports (door 1
/// closed, door 2 open) are published. Every subscription made here is
/// released before returning.
pub fn run_scripted(context: &EventContext) -> ActionLog {
    let log = ActionLog::new();
    let mut manager = SubscriptionManager::with_capacity(2);

    let sensor = TemperatureSensor::new(context);
    let _climate = ClimateController::attach(
        &mut manager,
        context,
        ClimateThresholds::default(),
        log.clone(),
    );
    let door_monitor = DoorMonitor::new(context);
    let _security = SecuritySystem::attach(&mut manager, context, log.clone());
    info!(subscriptions = manager.len(), "controllers attached");

    sensor.update(22.5);
    sensor.update(27.3);
    door_monitor.check_door(1, false);
    door_monitor.check_door(2, true);

    drop(manager);
    info!(actions = log.len(), "demo sequence finished");
    log
}
