//! rk-tree: the rocket component tree and its change tracking.
//!
//! Provides:
//! - Component nodes (nose cones, body tubes, transitions, inner tubes,
//!   launch lugs) in an arena-backed tree with attachment rules
//! - The `Rocket` root: modification counters, listener notification and
//!   freeze/thaw batching, undo snapshots
//! - Lateral mounting of surface components
//! - Motor configuration registry and the active configuration
//!
//! # Example
//!
//! ```
//! use rk_tree::{Component, Rocket};
//!
//! let mut rocket = Rocket::new();
//! let stage = rocket.add_child(rocket.root(), Component::stage()).unwrap();
//! let body = rocket.add_child(stage, Component::body_tube()).unwrap();
//!
//! let mass_id = rocket.mass_modification_id();
//! rocket.modify(body, |c| c.set_length(0.5)).unwrap();
//! assert!(rocket.mass_modification_id() > mass_id);
//! assert!(rocket.component(body).unwrap().mass() > 0.0);
//! ```

pub mod bus;
pub mod component;
pub mod configuration;
pub mod error;
pub mod event;
pub mod mass;
pub mod motor;
pub mod motor_config;
pub mod mount;
pub mod rocket;
pub mod tracker;
pub mod tree;

// Re-exports
pub use bus::Channel;
pub use component::{
    Component, ComponentKind, ComponentType, InnerTube, LaunchLug, RelativePosition, SymmetricBody,
};
pub use configuration::{Configuration, mass_summary_label};
pub use error::{TreeError, TreeResult};
pub use event::{ChangeEvent, ChangeKind};
pub use mass::SubtreeSummary;
pub use motor::{Motor, MotorConfigId, MotorDelay, MotorMount, MotorMountData, MotorSlot};
pub use motor_config::MotorConfigurations;
pub use mount::MountShift;
pub use rocket::{DesignSettings, FreezeGuard, ReferenceType, Rocket, RocketState};
pub use tracker::{ModIds, ModificationTracker};
pub use tree::ComponentTree;
