mod chart_host;
pub mod element_schema;
mod null_chart;
mod scene;
pub mod scene_builder;

pub use chart_host::{ChartHost, ChartListener, ChartOption, GraphicSlot, UpdateRequest};
pub use element_schema::{FieldBucket, route_prop};
pub use null_chart::NullChart;
pub use scene::{ROOT_ACTION, SceneElement, SceneTree};
pub use scene_builder::build as build_scene;
