use std::rc::Rc;

use chart_graphic::api::{GraphicElement, GraphicWarning, MicrotaskQueue};
use chart_graphic::core::{Declared, DeclaredElement, ElementKind, HandlerValue};
use chart_graphic::render::{ChartOption, NullChart, UpdateRequest};
use chart_graphic::{GraphicConfig, GraphicError, GraphicIntegration};
use serde_json::json;

fn build(config: GraphicConfig) -> (NullChart, MicrotaskQueue, GraphicIntegration<NullChart>) {
    let chart = NullChart::new();
    let queue = MicrotaskQueue::new();
    let integration = GraphicIntegration::new(chart.clone(), config, Rc::new(queue.clone()))
        .expect("integration init");
    (chart, queue, integration)
}

fn rect(id: &str) -> DeclaredElement {
    DeclaredElement::new(ElementKind::Rect)
        .with_id(id)
        .with_prop("width", json!(10))
}

fn declare(entries: &[DeclaredElement]) -> Vec<Declared> {
    entries.iter().cloned().map(Declared::from).collect()
}

fn collision_warnings(integration: &GraphicIntegration<NullChart>) -> usize {
    integration
        .warnings()
        .count_where(|warning| matches!(warning, GraphicWarning::OptionKeyCollision { .. }))
}

#[test]
fn invalid_config_is_rejected() {
    let chart = NullChart::new();
    let result = GraphicIntegration::new(
        chart,
        GraphicConfig::default().with_graphics_key(" "),
        Rc::new(MicrotaskQueue::new()),
    );
    assert!(matches!(result, Err(GraphicError::InvalidConfig(_))));
}

#[test]
fn flush_pushes_only_the_graphics_key_with_replace_merge() {
    let (chart, queue, integration) = build(GraphicConfig::default());
    let tree = declare(&[rect("a")]);
    let mount = integration.render(Some(tree.as_slice())).expect("mount");
    let mut a = GraphicElement::new(Some(mount.context));
    a.update(&rect("a"));
    queue.run_until_idle();

    assert_eq!(chart.update_count(), 1);
    let request = chart.last_request().expect("request");
    assert_eq!(request.replace_merge, vec!["graphic"]);
    assert!(!request.not_merge);
    assert_eq!(
        chart.last_option().expect("option").to_value().expect("json"),
        json!({
            "graphic": {
                "elements": [{
                    "type": "group",
                    "id": "__graphic_root__",
                    "$action": "replace",
                    "children": [{"type": "rect", "id": "a", "shape": {"width": 10}}]
                }]
            }
        })
    );
}

#[test]
fn removal_pushes_an_empty_root() {
    let (chart, queue, integration) = build(GraphicConfig::default());
    let mut a = GraphicElement::new(Some(integration.context()));
    a.update(&rect("a"));
    queue.run_until_idle();

    a.unmount();
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 2);
    let option = chart.last_option().expect("option");
    let scene = option.scene().expect("scene");
    assert!(scene.children.is_empty());
    assert_eq!(
        option.to_value().expect("json")["graphic"]["elements"][0]["children"],
        json!([])
    );
}

#[test]
fn patch_option_is_identity_without_subtree() {
    let (_chart, _queue, integration) = build(GraphicConfig::default());
    let option = ChartOption::new().with_field("graphic", json!({"elements": []}));
    let patched = integration.patch_option(option);
    assert!(patched.graphic.is_none());
    assert_eq!(patched.fields.get("graphic"), Some(&json!({"elements": []})));
    assert_eq!(collision_warnings(&integration), 0);

    let tree = declare(&[rect("a")]);
    integration.render(Some(tree.as_slice()));
    integration.render::<Declared>(None);
    let patched = integration.patch_option(ChartOption::new().with_field("series", json!([])));
    assert!(patched.graphic.is_none());
}

#[test]
fn patch_option_installs_latest_scene_and_keeps_other_fields() {
    let (_chart, queue, integration) = build(GraphicConfig::default());
    let tree = declare(&[rect("a")]);
    let mount = integration.render(Some(tree.as_slice())).expect("mount");
    let mut a = GraphicElement::new(Some(mount.context));
    a.update(&rect("a"));
    queue.run_until_idle();

    let patched = integration.patch_option(
        ChartOption::from_value(json!({"xAxis": {"type": "time"}, "series": []})),
    );
    let value = patched.to_value().expect("json");
    assert_eq!(value["xAxis"], json!({"type": "time"}));
    assert_eq!(value["series"], json!([]));
    assert_eq!(value["graphic"]["elements"][0]["children"][0]["id"], json!("a"));
}

#[test]
fn caller_value_under_graphics_key_is_discarded_with_one_warning() {
    let (_chart, _queue, integration) = build(GraphicConfig::default());
    let tree = declare(&[]);
    integration.render(Some(tree.as_slice()));

    for _ in 0..3 {
        let patched = integration.patch_option(
            ChartOption::new().with_field("graphic", json!({"elements": [{"type": "text"}]})),
        );
        assert!(!patched.fields.contains_key("graphic"));
        assert!(patched.scene().expect("scene").children.is_empty());
    }
    assert_eq!(collision_warnings(&integration), 1);
}

#[test]
fn custom_graphics_key_and_root_id_are_honoured() {
    let config = GraphicConfig::default()
        .with_graphics_key("overlay")
        .with_root_id("root-1");
    let (chart, queue, integration) = build(config);
    let mut a = GraphicElement::new(Some(integration.context()));
    a.update(&rect("a"));
    queue.run_until_idle();

    assert_eq!(chart.last_request().expect("request").replace_merge, vec!["overlay"]);
    let value = chart.last_option().expect("option").to_value().expect("json");
    assert_eq!(value["overlay"]["elements"][0]["id"], json!("root-1"));
    assert!(value.get("graphic").is_none());
}

#[test]
fn manual_update_suppresses_pushes_but_keeps_scene_current() {
    let (chart, queue, integration) = build(GraphicConfig::default().with_manual_update(true));
    let tree = declare(&[rect("a")]);
    let mount = integration.render(Some(tree.as_slice())).expect("mount");
    let mut a = GraphicElement::new(Some(mount.context));
    a.update(&rect("a").with_handler("click", HandlerValue::function(|_| {})));
    queue.run_until_idle();
    a.update(&rect("a").with_prop("fill", json!("red")).with_handler("click", HandlerValue::function(|_| {})));
    queue.run_until_idle();

    assert_eq!(chart.update_count(), 0);
    assert_eq!(chart.listener_names(), vec!["click"]);
    assert_eq!(
        integration
            .warnings()
            .count_where(|warning| *warning == GraphicWarning::UpdateSuppressed),
        1
    );

    let planned = UpdateRequest {
        not_merge: true,
        replace_merge: vec!["series".to_owned()],
        ..UpdateRequest::default()
    };
    integration
        .set_option(ChartOption::new().with_field("series", json!([])), planned)
        .expect("set option");

    assert_eq!(chart.update_count(), 1);
    let request = chart.last_request().expect("request");
    assert!(request.not_merge);
    assert_eq!(request.replace_merge, vec!["series", "graphic"]);
    let value = chart.last_option().expect("option").to_value().expect("json");
    assert_eq!(
        value["graphic"]["elements"][0]["children"][0]["style"],
        json!({"fill": "red"})
    );
}

#[test]
fn resuming_automatic_updates_pushes_next_flush() {
    let (chart, queue, integration) = build(GraphicConfig::default());
    integration.set_manual_update(true);
    assert!(integration.is_manual_update());
    let mut a = GraphicElement::new(Some(integration.context()));
    a.update(&rect("a"));
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 0);

    integration.set_manual_update(false);
    a.update(&rect("a").with_prop("height", json!(4)));
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 1);
}

#[test]
fn set_option_without_subtree_passes_request_through() {
    let (chart, _queue, integration) = build(GraphicConfig::default());
    integration
        .set_option(
            ChartOption::new().with_field("title", json!({"text": "t"})),
            UpdateRequest::default(),
        )
        .expect("set option");
    let request = chart.last_request().expect("request");
    assert!(request.replace_merge.is_empty());
    assert!(chart.last_option().expect("option").graphic.is_none());
}

#[test]
fn host_failure_is_logged_and_next_flush_recovers() {
    let (chart, queue, integration) = build(GraphicConfig::default());
    let mut a = GraphicElement::new(Some(integration.context()));
    chart.fail_next_update("chart disposed");
    a.update(&rect("a"));
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 0);
    assert_eq!(integration.last_scene().child_ids(), vec!["a"]);

    a.update(&rect("a").with_prop("height", json!(2)));
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 1);
}

#[test]
fn set_option_surfaces_host_errors() {
    let (chart, _queue, integration) = build(GraphicConfig::default());
    chart.fail_next_update("boom");
    let result = integration.set_option(ChartOption::new(), UpdateRequest::default());
    assert!(matches!(result, Err(GraphicError::Host(message)) if message == "boom"));
}

#[test]
fn dispose_stops_updates_and_ignores_queued_flush() {
    let (chart, queue, integration) = build(GraphicConfig::default());
    let tree = declare(&[rect("a")]);
    integration.render(Some(tree.as_slice()));
    let mut a = GraphicElement::new(Some(integration.context()));
    a.update(&rect("a"));

    integration.dispose();
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 0);
    assert!(integration.last_scene().children.is_empty());
    assert!(integration.render(Some(tree.as_slice())).is_none());

    a.update(&rect("a"));
    assert!(queue.is_idle());
    integration.dispose();
}

#[test]
fn dropping_integration_turns_pending_flush_into_noop() {
    let (chart, queue, integration) = build(GraphicConfig::default());
    let mut a = GraphicElement::new(Some(integration.context()));
    a.update(&rect("a"));
    a.unmount();
    drop(a);
    drop(integration);
    queue.run_until_idle();
    assert_eq!(chart.update_count(), 0);
}
