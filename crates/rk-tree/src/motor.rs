//! Motor mounts and the motor data they reference.
//!
//! Thrust curves and motor selection live elsewhere; the tree only needs a
//! motor's designation and how many identical motors a mount carries.

use core::fmt;
use std::collections::HashMap;

/// Identifier of a motor configuration.
///
/// The registry always holds [`MotorConfigId::Default`] first; it can be
/// neither added twice nor removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorConfigId {
    Default,
    Named(String),
}

impl MotorConfigId {
    pub fn named(id: impl Into<String>) -> Self {
        MotorConfigId::Named(id.into())
    }
}

impl fmt::Display for MotorConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorConfigId::Default => write!(f, "<default>"),
            MotorConfigId::Named(id) => write!(f, "{id}"),
        }
    }
}

/// A commercial or custom motor, identified by its designation (e.g. "C6").
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motor {
    pub manufacturer: String,
    pub designation: String,
}

impl Motor {
    pub fn new(manufacturer: impl Into<String>, designation: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            designation: designation.into(),
        }
    }

    /// Designation with the ejection delay appended: `"C6-5"`, `"D12-3.5"`,
    /// or `"C6-P"` for a plugged motor.
    pub fn designation_with_delay(&self, delay: MotorDelay) -> String {
        format!("{}-{}", self.designation, delay)
    }
}

/// Ejection charge delay.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorDelay {
    /// No ejection charge.
    Plugged,
    Seconds(f64),
}

impl fmt::Display for MotorDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MotorDelay::Plugged => write!(f, "P"),
            MotorDelay::Seconds(s) if !s.is_finite() => write!(f, "P"),
            MotorDelay::Seconds(s) => {
                let rounded = (s * 10.0).round() / 10.0;
                if (rounded - rounded.round()).abs() < 1e-9 {
                    write!(f, "{:.0}", rounded)
                } else {
                    write!(f, "{:.1}", rounded)
                }
            }
        }
    }
}

/// Motor selected for one configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorSlot {
    pub motor: Motor,
    pub delay: MotorDelay,
}

/// Capability of nodes that can hold motors.
pub trait MotorMount {
    /// Whether the node is currently acting as a motor mount.
    fn is_motor_mount(&self) -> bool;

    /// Motor assigned for `config`, if any.
    fn motor(&self, config: &MotorConfigId) -> Option<&Motor>;

    /// Ejection delay for `config`; plugged when no motor is assigned.
    fn motor_delay(&self, config: &MotorConfigId) -> MotorDelay;

    /// Number of physically identical motors held by the mount.
    fn motor_count(&self) -> u32;
}

/// Motor assignments stored on mount-capable nodes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorMountData {
    active: bool,
    cluster_count: u32,
    motors: HashMap<MotorConfigId, MotorSlot>,
}

impl Default for MotorMountData {
    fn default() -> Self {
        Self {
            active: false,
            cluster_count: 1,
            motors: HashMap::new(),
        }
    }
}

impl MotorMountData {
    pub fn set_active(&mut self, active: bool) -> bool {
        if self.active == active {
            return false;
        }
        self.active = active;
        true
    }

    /// Cluster size; at least one.
    pub fn set_cluster_count(&mut self, count: u32) -> bool {
        let count = count.max(1);
        if self.cluster_count == count {
            return false;
        }
        self.cluster_count = count;
        true
    }

    /// Assign (or clear with `None`) the motor used by `config`.
    pub fn set_motor(&mut self, config: MotorConfigId, slot: Option<MotorSlot>) -> bool {
        match slot {
            Some(slot) => {
                if self.motors.get(&config) == Some(&slot) {
                    return false;
                }
                self.motors.insert(config, slot);
                true
            }
            None => self.motors.remove(&config).is_some(),
        }
    }

    /// Forget assignments for a configuration that no longer exists.
    pub(crate) fn forget(&mut self, config: &MotorConfigId) -> bool {
        self.motors.remove(config).is_some()
    }
}

impl MotorMount for MotorMountData {
    fn is_motor_mount(&self) -> bool {
        self.active
    }

    fn motor(&self, config: &MotorConfigId) -> Option<&Motor> {
        self.motors.get(config).map(|slot| &slot.motor)
    }

    fn motor_delay(&self, config: &MotorConfigId) -> MotorDelay {
        self.motors
            .get(config)
            .map(|slot| slot.delay)
            .unwrap_or(MotorDelay::Plugged)
    }

    fn motor_count(&self) -> u32 {
        self.cluster_count
    }
}
