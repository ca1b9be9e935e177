//! Host collaborators.
//!
//! The pooling core never creates, destroys or moves anything itself. It
//! drives a [`Host`] that owns the real objects. [`SceneWorld`] is a small
//! reference host built on generational handles, used by the runtime and the
//! tests.

mod entity;
mod world;

pub use entity::{Entity, PrefabId};
pub use world::{Prefab, SceneWorld};

use crate::math::Spatial;
use std::fmt::Debug;
use std::hash::Hash;

/// Capabilities the pools need from the environment that owns instances.
///
/// `is_live` must be safe to call on a handle that was destroyed, by this
/// system or by anyone else. Generation-checked handles satisfy this.
pub trait Host {
    /// Blueprint identity; the pooling key.
    type Template: Copy + Eq + Hash + Debug;
    /// Handle to a created instance.
    type Instance: Copy + Eq + Hash + Debug;

    fn instantiate(&mut self, template: Self::Template) -> Self::Instance;

    fn destroy(&mut self, instance: Self::Instance);

    fn set_active(&mut self, instance: Self::Instance, active: bool);

    /// Spatial state instances of `template` are reset to on release.
    fn template_spatial(&self, template: Self::Template) -> Option<Spatial>;

    fn set_spatial(&mut self, instance: Self::Instance, spatial: Spatial);

    fn is_live(&self, instance: Self::Instance) -> bool;

    fn is_template_live(&self, template: Self::Template) -> bool;

    fn template_name(&self, template: Self::Template) -> String {
        format!("{template:?}")
    }

    fn set_name(&mut self, _instance: Self::Instance, _name: String) {}
}
