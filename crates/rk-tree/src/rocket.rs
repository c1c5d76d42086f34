//! The rocket: tree owner, change tracking and notification.
//!
//! Every mutation goes through [`Rocket`], which stamps the modification
//! counters, keeps derived caches and mount shifts coherent and then tells
//! the listeners. Between [`Rocket::freeze`] and [`Rocket::thaw`] listener
//! delivery is deferred and the buffered events are coalesced into one.

use crate::bus::{Channel, NotificationBus};
use crate::component::{Component, ComponentType};
use crate::configuration::Configuration;
use crate::error::{TreeError, TreeResult};
use crate::event::{ChangeEvent, ChangeKind};
use crate::mass::{self, SubtreeSummary};
use crate::motor::MotorConfigId;
use crate::motor_config::MotorConfigurations;
use crate::mount::{self, MountShift};
use crate::tracker::{ModIds, ModificationTracker};
use crate::tree::ComponentTree;
use core::ops::{Deref, DerefMut};
use rk_core::numeric::approx_eq;
use rk_core::{ComponentId, ListenerId, ModId, ModIdSequence};
use rk_geometry::Coordinate;
use tracing::{debug, trace, warn};

/// Smallest custom reference length accepted (m).
pub const MIN_REFERENCE_LENGTH: f64 = 0.001;
/// Initial custom reference length (m).
pub const DEFAULT_REFERENCE_LENGTH: f64 = 0.01;

/// What the aerodynamic reference length is taken from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceType {
    /// Base diameter of the nose cone.
    NoseCone,
    /// Largest body diameter.
    #[default]
    Maximum,
    /// User-given length.
    Custom,
}

/// Rocket-wide design metadata and aerodynamic options.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignSettings {
    pub designer: String,
    pub revision: String,
    pub reference_type: ReferenceType,
    pub custom_reference_length: f64,
    pub perfect_finish: bool,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            designer: String::new(),
            revision: String::new(),
            reference_type: ReferenceType::default(),
            custom_reference_length: DEFAULT_REFERENCE_LENGTH,
            perfect_finish: false,
        }
    }
}

/// Everything [`Rocket::restore`] needs to bring a rocket back to an
/// earlier point of its history.
#[derive(Clone, Debug)]
pub struct RocketState {
    tree: ComponentTree,
    mod_ids: ModIds,
    motor_configs: MotorConfigurations,
    settings: DesignSettings,
}

impl RocketState {
    pub fn mod_ids(&self) -> ModIds {
        self.mod_ids
    }
}

/// Root of a rocket design.
#[derive(Debug)]
pub struct Rocket {
    tree: ComponentTree,
    tracker: ModificationTracker,
    bus: NotificationBus,
    motor_configs: MotorConfigurations,
    settings: DesignSettings,
    default_configuration: Configuration,
}

impl Default for Rocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Rocket {
    /// Empty rocket drawing IDs from the process-wide sequence.
    pub fn new() -> Self {
        Self::with_sequence(ModIdSequence::global())
    }

    /// Empty rocket drawing IDs from `seq`.
    pub fn with_sequence(seq: ModIdSequence) -> Self {
        Self {
            tree: ComponentTree::new(),
            tracker: ModificationTracker::new(seq),
            bus: NotificationBus::new(),
            motor_configs: MotorConfigurations::default(),
            settings: DesignSettings::default(),
            default_configuration: Configuration::default(),
        }
    }

    pub fn root(&self) -> ComponentId {
        self.tree.root()
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn component(&self, id: ComponentId) -> TreeResult<&Component> {
        self.tree.get(id)
    }

    pub fn stage_count(&self) -> usize {
        self.tree.stages().len()
    }

    // ---------------------------------------------------------------------
    // Modification IDs
    // ---------------------------------------------------------------------

    pub fn mod_ids(&self) -> ModIds {
        self.tracker.ids()
    }

    pub fn modification_id(&self) -> ModId {
        self.tracker.ids().overall
    }

    pub fn mass_modification_id(&self) -> ModId {
        self.tracker.ids().mass
    }

    pub fn aerodynamic_modification_id(&self) -> ModId {
        self.tracker.ids().aerodynamic
    }

    pub fn tree_modification_id(&self) -> ModId {
        self.tracker.ids().tree
    }

    pub fn functional_modification_id(&self) -> ModId {
        self.tracker.ids().functional
    }

    // ---------------------------------------------------------------------
    // Notification
    // ---------------------------------------------------------------------

    pub fn add_component_change_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.bus.add(Channel::Component, listener)
    }

    pub fn add_state_change_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.bus.add(Channel::State, listener)
    }

    /// Unregister a listener of either kind.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.bus.remove(id)
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.bus.listener_count(channel)
    }

    /// Record a change and, unless frozen, propagate it.
    pub fn fire(&mut self, event: ChangeEvent) {
        self.tracker.record(event.kind);

        let Some(event) = self.bus.buffer(event) else {
            trace!(source = %event.source, kind = ?event.kind, "event buffered");
            return;
        };
        debug!(source = %event.source, kind = ?event.kind, "firing change event");
        self.propagate(&event);
    }

    /// Invalidate caches, refresh mount shifts, then tell the listeners.
    fn propagate(&mut self, event: &ChangeEvent) {
        for component in self.tree.components_mut() {
            component.component_changed(event.kind);
        }
        if let Err(err) = mount::refresh_mount_shifts(&mut self.tree) {
            warn!(%err, "mount shift refresh failed");
        }
        self.bus.dispatch(event);
    }

    fn fire_kind(&mut self, source: ComponentId, kind: ChangeKind) {
        self.fire(ChangeEvent::new(source, kind));
    }

    /// Start buffering events. Does nothing when already frozen.
    pub fn freeze(&mut self) {
        if self.bus.freeze() {
            debug!("rocket frozen");
        }
    }

    /// Stop buffering and fire one event carrying every buffered kind,
    /// attributed to the last buffered source. Nothing fires for an empty
    /// batch or when not frozen.
    pub fn thaw(&mut self) {
        let was_frozen = self.bus.is_frozen();
        match self.bus.take_batch() {
            Some(event) => {
                debug!(kind = ?event.kind, "thawing with coalesced event");
                self.fire(event);
            }
            None if was_frozen => debug!("thawed without changes"),
            None => {}
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.bus.is_frozen()
    }

    /// Freeze until the returned guard is dropped.
    ///
    /// Freezing does not nest: dropping any guard thaws the rocket, even if
    /// it was already frozen when the guard was taken.
    pub fn frozen(&mut self) -> FreezeGuard<'_> {
        self.freeze();
        FreezeGuard { rocket: self }
    }

    /// Run `f` with delivery deferred; listeners see one coalesced event.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Rocket) -> R) -> R {
        let mut guard = self.frozen();
        f(&mut guard)
    }

    // ---------------------------------------------------------------------
    // Component edits
    // ---------------------------------------------------------------------

    /// Apply a setter to one component and fire what it reports.
    ///
    /// Returns whether anything changed.
    pub fn modify<F>(&mut self, id: ComponentId, f: F) -> TreeResult<bool>
    where
        F: FnOnce(&mut Component) -> Option<ChangeKind>,
    {
        let component = self.tree.get_mut(id)?;
        match f(component) {
            Some(kind) if !kind.is_empty() => {
                self.fire_kind(id, kind);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn is_compatible(&self, parent: ComponentId, child: ComponentType) -> bool {
        self.tree.is_compatible(parent, child)
    }

    /// Append `component` to `parent`'s children.
    pub fn add_child(&mut self, parent: ComponentId, component: Component) -> TreeResult<ComponentId> {
        self.attach(parent, None, component)
    }

    /// Insert `component` at `index` among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: ComponentId,
        index: usize,
        component: Component,
    ) -> TreeResult<ComponentId> {
        self.attach(parent, Some(index), component)
    }

    fn attach(
        &mut self,
        parent: ComponentId,
        index: Option<usize>,
        component: Component,
    ) -> TreeResult<ComponentId> {
        let kind = structural_kind([&component]);
        let id = self.tree.insert(parent, index, component)?;
        debug!(component = %id, parent = %parent, "component attached");
        self.fire_kind(id, kind);
        Ok(id)
    }

    /// Detach `id` and destroy its subtree. Its handles become invalid.
    pub fn remove_child(&mut self, id: ComponentId) -> TreeResult<()> {
        let parent = self.tree.parent(id)?.ok_or(TreeError::RootRemoval)?;
        let removed = self.tree.remove(id)?;
        let kind = structural_kind(&removed);
        debug!(component = %id, nodes = removed.len(), "subtree removed");
        self.fire_kind(parent, kind);
        Ok(())
    }

    /// Move `id` to `index` among its siblings.
    pub fn move_child(&mut self, id: ComponentId, index: usize) -> TreeResult<()> {
        if self.tree.child_index(id)? == Some(index) {
            return Ok(());
        }
        self.tree.move_child(id, index)?;
        let kind = structural_kind([self.tree.get(id)?]);
        self.fire_kind(id, kind);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Positions and mass
    // ---------------------------------------------------------------------

    pub fn length(&self) -> f64 {
        self.tree.length(self.root()).unwrap_or(0.0)
    }

    pub fn mount_shift(&self, id: ComponentId) -> TreeResult<MountShift> {
        Ok(self.tree.get(id)?.mount_shift())
    }

    /// Absolute position of the fore end of `id`, mount shift applied.
    pub fn absolute_position(&self, id: ComponentId) -> TreeResult<Coordinate> {
        let shift = self.mount_shift(id)?;
        Ok(Coordinate::point(self.tree.absolute_x(id)?, shift.y, shift.z))
    }

    pub fn absolute_cg(&self, id: ComponentId) -> TreeResult<Coordinate> {
        mass::absolute_cg(&self.tree, id)
    }

    pub fn subtree_summary(&self, id: ComponentId) -> TreeResult<SubtreeSummary> {
        mass::subtree_summary(&self.tree, id)
    }

    // ---------------------------------------------------------------------
    // Design settings
    // ---------------------------------------------------------------------

    pub fn settings(&self) -> &DesignSettings {
        &self.settings
    }

    pub fn set_designer(&mut self, designer: impl Into<String>) {
        let designer = designer.into();
        if self.settings.designer != designer {
            self.settings.designer = designer;
            self.fire_kind(self.root(), ChangeKind::NONFUNCTIONAL);
        }
    }

    pub fn set_revision(&mut self, revision: impl Into<String>) {
        let revision = revision.into();
        if self.settings.revision != revision {
            self.settings.revision = revision;
            self.fire_kind(self.root(), ChangeKind::NONFUNCTIONAL);
        }
    }

    pub fn set_reference_type(&mut self, reference_type: ReferenceType) {
        if self.settings.reference_type != reference_type {
            self.settings.reference_type = reference_type;
            self.fire_kind(self.root(), ChangeKind::NONFUNCTIONAL);
        }
    }

    /// Floored at [`MIN_REFERENCE_LENGTH`]. Only fires while the reference
    /// type is [`ReferenceType::Custom`].
    pub fn set_custom_reference_length(&mut self, length: f64) {
        let length = length.max(MIN_REFERENCE_LENGTH);
        if approx_eq(self.settings.custom_reference_length, length) {
            return;
        }
        self.settings.custom_reference_length = length;
        if self.settings.reference_type == ReferenceType::Custom {
            self.fire_kind(self.root(), ChangeKind::NONFUNCTIONAL);
        }
    }

    pub fn set_perfect_finish(&mut self, perfect: bool) {
        if self.settings.perfect_finish != perfect {
            self.settings.perfect_finish = perfect;
            self.fire_kind(self.root(), ChangeKind::AERODYNAMIC);
        }
    }

    // ---------------------------------------------------------------------
    // Motor configurations
    // ---------------------------------------------------------------------

    pub fn motor_configurations(&self) -> &MotorConfigurations {
        &self.motor_configs
    }

    pub fn motor_config_ids(&self) -> &[MotorConfigId] {
        self.motor_configs.ids()
    }

    /// Generate a fresh random id and register it.
    pub fn new_motor_config_id(&mut self) -> MotorConfigId {
        let id = MotorConfigurations::new_id();
        self.add_motor_config_id(id.clone());
        id
    }

    /// Register `id`; false for the default id and for duplicates.
    pub fn add_motor_config_id(&mut self, id: MotorConfigId) -> bool {
        if !self.motor_configs.add(id.clone()) {
            return false;
        }
        debug!(config = %id, "motor configuration added");
        self.fire_kind(self.root(), ChangeKind::MOTOR);
        true
    }

    /// Unregister `id`, dropping its name and every mount assignment made
    /// for it. The default id is silently kept.
    pub fn remove_motor_config_id(&mut self, id: &MotorConfigId) -> bool {
        if !self.motor_configs.remove(id) {
            return false;
        }
        for component in self.tree.components_mut() {
            if let Some(mount) = component.motor_mount_mut() {
                mount.forget(id);
            }
        }
        if self.default_configuration.motor_config() == id {
            self.default_configuration
                .set_motor_config(MotorConfigId::Default);
        }
        debug!(config = %id, "motor configuration removed");
        self.fire_kind(self.root(), ChangeKind::MOTOR);
        true
    }

    /// User-given name, `""` when unset.
    pub fn motor_config_name(&self, id: &MotorConfigId) -> &str {
        self.motor_configs.name(id)
    }

    pub fn set_motor_config_name(&mut self, id: &MotorConfigId, name: &str) -> TreeResult<()> {
        if self.motor_configs.set_name(id, name)? {
            self.fire_kind(self.root(), ChangeKind::NONFUNCTIONAL);
        }
        Ok(())
    }

    pub fn motor_config_description(&self, id: &MotorConfigId) -> TreeResult<String> {
        self.motor_configs.describe(&self.tree, id)
    }

    pub fn default_configuration(&self) -> &Configuration {
        &self.default_configuration
    }

    pub fn default_configuration_mut(&mut self) -> &mut Configuration {
        &mut self.default_configuration
    }

    /// Whether the default configuration flies with any motor.
    pub fn has_active_motors(&self) -> bool {
        self.default_configuration.has_motors(self)
    }

    // ---------------------------------------------------------------------
    // Undo support
    // ---------------------------------------------------------------------

    pub fn snapshot(&self) -> RocketState {
        RocketState {
            tree: self.tree.clone(),
            mod_ids: self.tracker.ids(),
            motor_configs: self.motor_configs.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Bring back an earlier snapshot.
    ///
    /// Fires `UNDO | NONFUNCTIONAL` plus the category of every counter that
    /// differs from the current one. Counters take the snapshot's values
    /// rather than fresh ones. Listeners stay registered.
    pub fn restore(&mut self, state: RocketState) {
        let current = self.tracker.ids();
        let mut kind = ChangeKind::UNDO | ChangeKind::NONFUNCTIONAL;
        if current.mass != state.mod_ids.mass {
            kind |= ChangeKind::MASS;
        }
        if current.aerodynamic != state.mod_ids.aerodynamic {
            kind |= ChangeKind::AERODYNAMIC;
        }
        if current.tree != state.mod_ids.tree {
            kind |= ChangeKind::TREE;
        }

        debug!(?kind, overall = %state.mod_ids.overall, "restoring rocket state");
        self.tree = state.tree;
        self.motor_configs = state.motor_configs;
        self.settings = state.settings;
        self.tracker.restore(state.mod_ids);
        if !self
            .motor_configs
            .contains(self.default_configuration.motor_config())
        {
            self.default_configuration
                .set_motor_config(MotorConfigId::Default);
        }
        self.fire_kind(self.root(), kind);
    }
}

/// TREE plus the physical categories present among `nodes`.
fn structural_kind<'a>(nodes: impl IntoIterator<Item = &'a Component>) -> ChangeKind {
    nodes
        .into_iter()
        .fold(ChangeKind::TREE, |kind, node| {
            let mut kind = kind;
            if node.is_massive() {
                kind |= ChangeKind::MASS;
            }
            if node.is_aerodynamic() {
                kind |= ChangeKind::AERODYNAMIC;
            }
            kind
        })
}

/// Keeps a [`Rocket`] frozen while alive. See [`Rocket::frozen`].
pub struct FreezeGuard<'a> {
    rocket: &'a mut Rocket,
}

impl Deref for FreezeGuard<'_> {
    type Target = Rocket;

    fn deref(&self) -> &Rocket {
        self.rocket
    }
}

impl DerefMut for FreezeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Rocket {
        self.rocket
    }
}

impl Drop for FreezeGuard<'_> {
    fn drop(&mut self) {
        self.rocket.thaw();
    }
}
