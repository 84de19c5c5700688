use std::rc::Rc;

use chart_graphic::api::{GraphicElement, MicrotaskQueue};
use chart_graphic::core::{Declared, DeclaredElement, ElementKind};
use chart_graphic::render::NullChart;
use chart_graphic::{GraphicConfig, GraphicIntegration};
use proptest::prelude::*;

fn integration() -> (MicrotaskQueue, GraphicIntegration<NullChart>) {
    let queue = MicrotaskQueue::new();
    let integration = GraphicIntegration::new(
        NullChart::new(),
        GraphicConfig::default(),
        Rc::new(queue.clone()),
    )
    .expect("integration init");
    (queue, integration)
}

proptest! {
    #[test]
    fn registration_order_never_changes_document_order(
        order in (1usize..12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle()),
        use_keys in any::<bool>(),
    ) {
        let count = order.len();
        let declared: Vec<DeclaredElement> = (0..count)
            .map(|i| {
                let element = DeclaredElement::new(ElementKind::Rect);
                if use_keys {
                    element.with_key(format!("k{i}"))
                } else {
                    element.with_id(format!("n{i}"))
                }
            })
            .collect();
        let tree: Vec<Declared> = declared.iter().cloned().map(Declared::from).collect();

        let (queue, integration) = integration();
        let mount = integration.render(Some(tree.as_slice())).expect("mount");
        let mut elements: Vec<GraphicElement> = (0..count)
            .map(|_| GraphicElement::new(Some(mount.context.clone())))
            .collect();
        for &index in &order {
            elements[index].update(&declared[index]);
        }
        queue.run_until_idle();

        let expected: Vec<String> = (0..count)
            .map(|i| if use_keys { format!("k{i}") } else { format!("n{i}") })
            .collect();
        let scene = integration.last_scene();
        prop_assert_eq!(scene.child_ids(), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn group_children_keep_document_order_under_shuffled_mounts(
        order in Just((0..6).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let children: Vec<DeclaredElement> = (0..6)
            .map(|i| DeclaredElement::new(ElementKind::Circle).with_id(format!("c{i}")))
            .collect();
        let group = DeclaredElement::group()
            .with_id("g")
            .with_children(children.iter().cloned().map(Declared::from));
        let tree = vec![Declared::from(group.clone())];

        let (queue, integration) = integration();
        let mount = integration.render(Some(tree.as_slice())).expect("mount");
        let mut group_element = GraphicElement::new(Some(mount.context.clone()));
        group_element.update(&group);
        let child_context = group_element.child_context().expect("child context");
        let mut elements: Vec<GraphicElement> = (0..6)
            .map(|_| GraphicElement::new(Some(child_context.clone())))
            .collect();
        for &index in &order {
            elements[index].update(&children[index]);
        }
        queue.run_until_idle();

        let scene = integration.last_scene();
        let ids: Vec<&str> = scene
            .find("g")
            .expect("group")
            .children
            .iter()
            .map(|child| child.id.as_str())
            .collect();
        prop_assert_eq!(ids, vec!["c0", "c1", "c2", "c3", "c4", "c5"]);
    }
}
