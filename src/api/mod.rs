mod collector;
mod component;
mod config;
mod flush_scheduler;
mod integration;
mod warnings;

pub use collector::{FlushCallback, GraphicCollector};
pub use component::{GraphicContext, GraphicElement};
pub use config::{DEFAULT_GRAPHICS_KEY, DEFAULT_ROOT_ID, GraphicConfig};
pub use flush_scheduler::{FlushScheduler, FlushTask, MicrotaskQueue};
pub use integration::{GraphicIntegration, MountDescriptor};
pub use warnings::{GraphicWarning, WarningLog, report_outside_context};
