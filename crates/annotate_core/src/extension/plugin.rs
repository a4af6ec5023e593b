//! Plugin contract and ordered plugin registry.

use crate::annotator::Annotator;
use log::debug;
use std::rc::Rc;

/// Capability object hooked into annotator initialization.
///
/// Every hook has an empty default body, so a plugin only implements what it
/// needs; a missing hook is a no-op, never an error.
pub trait Plugin {
    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called exactly once per annotator, either when the plugin is
    /// registered (for existing annotators) or when an annotator is created.
    fn on_init_annotator(&self, _annotator: &mut dyn Annotator) {}
}

/// Ordered plugin registry.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Rc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one plugin; registration order is replay order.
    pub fn register(&mut self, plugin: Rc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Runs every registered plugin's init hook against `annotator`.
    pub fn init_annotator(&self, annotator: &mut dyn Annotator) {
        for plugin in &self.plugins {
            init_plugin(plugin.as_ref(), annotator);
        }
    }
}

/// Runs one plugin's init hook against one annotator.
pub fn init_plugin(plugin: &dyn Plugin, annotator: &mut dyn Annotator) {
    debug!(
        "event=plugin_init module=extension status=ok plugin={}",
        plugin.name()
    );
    plugin.on_init_annotator(annotator);
}
