//! The active selection of stages and motor configuration.

use crate::motor::MotorConfigId;
use crate::rocket::Rocket;
use std::collections::BTreeSet;

/// Which stages are flown and with which motors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    motor_config: MotorConfigId,
    /// `None` means every stage is active.
    active_stages: Option<BTreeSet<usize>>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            motor_config: MotorConfigId::Default,
            active_stages: None,
        }
    }
}

impl Configuration {
    pub fn motor_config(&self) -> &MotorConfigId {
        &self.motor_config
    }

    pub fn set_motor_config(&mut self, id: MotorConfigId) {
        self.motor_config = id;
    }

    pub fn set_all_stages(&mut self) {
        self.active_stages = None;
    }

    pub fn set_only_stage(&mut self, stage: usize) {
        self.active_stages = Some(BTreeSet::from([stage]));
    }

    /// Activate stages `0..=stage` (the sustainer down to `stage`).
    pub fn set_to_stage(&mut self, stage: usize) {
        self.active_stages = Some((0..=stage).collect());
    }

    pub fn is_stage_active(&self, stage: usize) -> bool {
        self.active_stages
            .as_ref()
            .is_none_or(|active| active.contains(&stage))
    }

    /// Whether any active stage holds a motor for the selected configuration.
    pub fn has_motors(&self, rocket: &Rocket) -> bool {
        let tree = rocket.tree();
        tree.stages()
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.is_stage_active(index))
            .flat_map(|(_, &stage)| tree.iter_subtree(stage))
            .filter_map(|id| tree.get(id).ok())
            .filter_map(|node| node.motor_mount())
            .any(|mount| mount.is_motor_mount() && mount.motor(&self.motor_config).is_some())
    }
}

/// Caption for the mass line of a design summary.
pub fn mass_summary_label(has_motors: bool) -> &'static str {
    if has_motors {
        "Mass with motors"
    } else {
        "Mass with no motors"
    }
}
