use std::time::Duration;

use crate::device::ConfigAttribs;

/// Render thread configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Name given to the worker thread.
    pub thread_name: String,

    /// Animation phase advance per rendered frame, in degrees.
    pub angle_step: f32,

    /// Minimum attributes of the surface configuration.
    pub attribs: ConfigAttribs,

    /// How long the worker parks between iterations while no surface is bound.
    /// Publishing a command wakes it early.
    pub idle_wait: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            thread_name: "spindle-render".to_string(),
            angle_step: 1.2,
            attribs: ConfigAttribs::default(),
            idle_wait: Duration::from_millis(10),
        }
    }
}
