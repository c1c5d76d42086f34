//! Registry of motor configurations and their generated descriptions.

use crate::component::ComponentType;
use crate::error::{TreeError, TreeResult};
use crate::motor::MotorConfigId;
use crate::tree::ComponentTree;
use std::collections::HashMap;

/// Ordered set of motor configuration ids with optional user names.
///
/// [`MotorConfigId::Default`] is always present and always first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfigurations {
    ids: Vec<MotorConfigId>,
    names: HashMap<MotorConfigId, String>,
}

impl Default for MotorConfigurations {
    fn default() -> Self {
        Self {
            ids: vec![MotorConfigId::Default],
            names: HashMap::new(),
        }
    }
}

impl MotorConfigurations {
    /// A fresh random id, not yet registered.
    pub fn new_id() -> MotorConfigId {
        MotorConfigId::Named(uuid::Uuid::new_v4().to_string())
    }

    pub fn ids(&self) -> &[MotorConfigId] {
        &self.ids
    }

    pub fn contains(&self, id: &MotorConfigId) -> bool {
        self.ids.contains(id)
    }

    /// Register `id`. Returns false for the default id and for duplicates.
    pub fn add(&mut self, id: MotorConfigId) -> bool {
        if id == MotorConfigId::Default || self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Unregister `id` and forget its name. The default id is never removed.
    pub fn remove(&mut self, id: &MotorConfigId) -> bool {
        if *id == MotorConfigId::Default {
            return false;
        }
        let before = self.ids.len();
        self.ids.retain(|x| x != id);
        self.names.remove(id);
        self.ids.len() != before
    }

    /// User-given name, or `""` when none was set.
    pub fn name(&self, id: &MotorConfigId) -> &str {
        self.names.get(id).map(String::as_str).unwrap_or("")
    }

    /// Set or clear (with an empty string) the name of a registered id.
    /// Returns whether the stored name changed.
    pub fn set_name(&mut self, id: &MotorConfigId, name: &str) -> TreeResult<bool> {
        if !self.contains(id) {
            return Err(unknown(id));
        }
        if self.name(id) == name {
            return Ok(false);
        }
        if name.is_empty() {
            self.names.remove(id);
        } else {
            self.names.insert(id.clone(), name.to_owned());
        }
        Ok(true)
    }

    /// Human-readable description of `id`.
    ///
    /// The user-given name when there is one; otherwise the motors of each
    /// stage, e.g. `"[2×C6-5,D12-3; None]"`, or `"[No motors]"`.
    pub fn describe(&self, tree: &ComponentTree, id: &MotorConfigId) -> TreeResult<String> {
        if !self.contains(id) {
            return Err(unknown(id));
        }
        let name = self.name(id);
        if !name.is_empty() {
            return Ok(name.to_owned());
        }

        let mut stages: Vec<Vec<String>> = Vec::new();
        let mut motor_count = 0usize;
        for node_id in tree.iter_subtree(tree.root()) {
            let node = tree.get(node_id)?;
            if node.component_type() == ComponentType::Stage {
                stages.push(Vec::new());
                continue;
            }
            let Some(mount) = node.motor_mount() else {
                continue;
            };
            let Some(motor) = mount.motor(id).filter(|_| mount.is_motor_mount()) else {
                continue;
            };
            let designation = motor.designation_with_delay(mount.motor_delay(id));
            if let Some(current) = stages.last_mut() {
                for _ in 0..mount.motor_count() {
                    current.push(designation.clone());
                    motor_count += 1;
                }
            }
        }

        if motor_count == 0 {
            return Ok("[No motors]".to_owned());
        }

        let stages: Vec<String> = stages
            .into_iter()
            .map(|mut designations| {
                designations.sort();
                let text = group_repeats(&designations).join(",");
                if text.is_empty() { "None".to_owned() } else { text }
            })
            .collect();
        Ok(format!("[{}]", stages.join("; ")))
    }
}

fn unknown(id: &MotorConfigId) -> TreeError {
    TreeError::UnknownMotorConfig { id: id.to_string() }
}

/// Collapse runs of equal, adjacent entries into `"n×entry"`.
fn group_repeats(sorted: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = sorted.iter().peekable();
    while let Some(current) = iter.next() {
        let mut count = 1;
        while iter.next_if_eq(&current).is_some() {
            count += 1;
        }
        if count > 1 {
            out.push(format!("{count}\u{d7}{current}"));
        } else {
            out.push(current.clone());
        }
    }
    out
}
