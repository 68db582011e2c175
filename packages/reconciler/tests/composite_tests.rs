//! Composite components: state, lifecycle hooks and update passes

mod common;

use arbor_common::{
    create_element, Component, ComponentType, Element, PropValue, Props, ReconcileError, State,
};
use arbor_dom::{MemoryDom, NodeId};
use arbor_reconciler::{CompositeHandle, Instance, Lifecycle, ReconcileContext};
use common::{created_count, el, root_node, setup, text};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn root_handle(ctx: &ReconcileContext<MemoryDom>, container: NodeId) -> CompositeHandle<NodeId> {
    ctx.root_instance(&container)
        .and_then(Instance::as_composite)
        .cloned()
        .unwrap()
}

fn toggle_heading() -> ComponentType {
    ComponentType::builder("Heading")
        .initial_state(Props::new().with("large", false))
        .render(|props, state| {
            let tag = if state.get("large") == Some(&PropValue::Bool(true)) {
                "h1"
            } else {
                "p"
            };
            let label = props.get_str("label").unwrap_or("untitled").to_string();
            create_element(tag, None, vec![label.into()])
        })
        .build()
        .unwrap()
}

#[test]
fn test_composite_renders_its_child() {
    let (mut ctx, container) = setup();
    let heading = toggle_heading();

    ctx.render(
        &el(
            "div",
            Props::new(),
            vec![create_element(&heading, Some(&Props::new().with("label", "Hi")), vec![]).into()],
        ),
        &container,
    )
    .unwrap();

    let div = root_node(&ctx, container);
    let p = ctx.renderer().children(div)[0];
    assert_eq!(ctx.renderer().tag(p), Some("p"));
    assert_eq!(ctx.renderer().text_content(p), "Hi");
}

#[test]
fn test_set_state_replaces_rendered_type() {
    let (mut ctx, container) = setup();
    let heading = toggle_heading();

    ctx.render(&create_element(&heading, None, vec![]), &container)
        .unwrap();
    let handle = root_handle(&ctx, container);
    let p = root_node(&ctx, container);
    assert_eq!(ctx.renderer().tag(p), Some("p"));

    ctx.set_state(&handle, Props::new().with("large", true))
        .unwrap();

    let h1 = root_node(&ctx, container);
    assert_eq!(ctx.renderer().tag(h1), Some("h1"));
    assert_eq!(handle.node(), Some(h1));
    assert!(ctx.renderer().is_released(p));
    assert_eq!(handle.state().unwrap().get("large"), Some(&PropValue::Bool(true)));
    assert!(!handle.has_pending_state().unwrap());
}

#[test]
fn test_set_state_merges_partial_state() {
    let (mut ctx, container) = setup();
    let component = ComponentType::builder("Pair")
        .initial_state(Props::new().with("a", 1).with("b", 2))
        .render(|_, state| {
            let a = state.get("a").map(PropValue::to_text).unwrap_or_default();
            create_element("span", None, vec![a.into()])
        })
        .build()
        .unwrap();

    ctx.render(&create_element(&component, None, vec![]), &container)
        .unwrap();
    let handle = root_handle(&ctx, container);

    ctx.set_state(&handle, Props::new().with("a", 5)).unwrap();

    let state = handle.state().unwrap();
    assert_eq!(state.get_number("a"), Some(5.0));
    assert_eq!(state.get_number("b"), Some(2.0));
    assert_eq!(ctx.renderer().text_content(root_node(&ctx, container)), "5");
}

struct Counted {
    renders: Rc<Cell<usize>>,
}

impl Component for Counted {
    fn render(&self, _props: &Props, state: &State) -> Element {
        self.renders.set(self.renders.get() + 1);
        let count = state.get_number("count").unwrap_or(0.0);
        create_element("span", None, vec![count.into()])
    }
}

#[test]
fn test_set_state_is_not_batched() {
    let (mut ctx, container) = setup();
    let renders = Rc::new(Cell::new(0));

    let counter = renders.clone();
    let component = ComponentType::new("Counted", move |_| Counted {
        renders: counter.clone(),
    });

    ctx.render(&create_element(&component, None, vec![]), &container)
        .unwrap();
    let handle = root_handle(&ctx, container);
    assert_eq!(renders.get(), 1);
    ctx.renderer_mut().clear_ops();

    ctx.set_state(&handle, Props::new().with("count", 1)).unwrap();
    ctx.set_state(&handle, Props::new().with("count", 2)).unwrap();

    // one full pass per call, span reused both times
    assert_eq!(renders.get(), 3);
    assert_eq!(created_count(ctx.renderer().ops()), 0);
    assert_eq!(ctx.renderer().text_content(root_node(&ctx, container)), "2");
}

#[test]
fn test_nested_set_state_leaves_parent_alone() {
    let (mut ctx, container) = setup();
    let renders = Rc::new(Cell::new(0));

    let counter = renders.clone();
    let inner = ComponentType::new("Inner", move |_| Counted {
        renders: counter.clone(),
    });
    let outer = ComponentType::builder("Outer")
        .render(move |_, _| {
            create_element("section", None, vec![create_element(&inner, None, vec![]).into()])
        })
        .build()
        .unwrap();

    ctx.render(&create_element(&outer, None, vec![]), &container)
        .unwrap();
    let section = root_node(&ctx, container);

    let inner_handle = root_handle(&ctx, container)
        .with_rendered(|rendered| {
            rendered
                .as_host()
                .and_then(|host| host.children().first())
                .and_then(Instance::as_composite)
                .cloned()
        })
        .flatten()
        .unwrap();

    ctx.set_state(&inner_handle, Props::new().with("count", 7))
        .unwrap();

    assert_eq!(renders.get(), 2);
    assert_eq!(root_node(&ctx, container), section);
    assert_eq!(ctx.renderer().text_content(section), "7");
}

struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn push(&self, entry: &str) {
        self.log.borrow_mut().push(entry.to_string());
    }
}

impl Component for Recorder {
    fn render(&self, props: &Props, _state: &State) -> Element {
        self.push("render");
        text("div", props.get_str("label").unwrap_or(""))
    }

    fn will_mount(&mut self, _props: &Props, _state: &State) {
        self.push("will_mount");
    }

    fn will_receive_props(&mut self, _next_props: &Props, _state: &State) {
        self.push("will_receive_props");
    }

    fn should_update(&self, next_props: &Props, _next_state: &State) -> bool {
        self.push("should_update");
        next_props.get("frozen") != Some(&PropValue::Bool(true))
    }

    fn will_update(&mut self, _next_props: &Props, _next_state: &State) {
        self.push("will_update");
    }

    fn will_unmount(&mut self) {
        self.push("will_unmount");
    }
}

fn recorder() -> (ComponentType, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let shared = log.clone();
    let component = ComponentType::new("Recorder", move |_| Recorder {
        log: shared.clone(),
    });
    (component, log)
}

#[test]
fn test_lifecycle_hook_order() {
    let (mut ctx, container) = setup();
    let (component, log) = recorder();

    ctx.render(
        &create_element(&component, Some(&Props::new().with("label", "a")), vec![]),
        &container,
    )
    .unwrap();
    assert_eq!(*log.borrow(), vec!["will_mount", "render"]);
    log.borrow_mut().clear();

    ctx.render(
        &create_element(&component, Some(&Props::new().with("label", "b")), vec![]),
        &container,
    )
    .unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["will_receive_props", "should_update", "will_update", "render"]
    );
    log.borrow_mut().clear();

    ctx.unmount_root(&container).unwrap();
    assert_eq!(*log.borrow(), vec!["will_unmount"]);
}

#[test]
fn test_set_state_skips_will_receive_props() {
    let (mut ctx, container) = setup();
    let (component, log) = recorder();

    ctx.render(&create_element(&component, None, vec![]), &container)
        .unwrap();
    let handle = root_handle(&ctx, container);
    log.borrow_mut().clear();

    ctx.set_state(&handle, Props::new().with("x", 1)).unwrap();
    assert_eq!(*log.borrow(), vec!["should_update", "will_update", "render"]);
}

#[test]
fn test_should_update_false_stores_props_without_render() {
    let (mut ctx, container) = setup();
    let (component, log) = recorder();

    ctx.render(
        &create_element(&component, Some(&Props::new().with("label", "a")), vec![]),
        &container,
    )
    .unwrap();
    let handle = root_handle(&ctx, container);
    log.borrow_mut().clear();

    ctx.render(
        &create_element(
            &component,
            Some(&Props::new().with("label", "b").with("frozen", true)),
            vec![],
        ),
        &container,
    )
    .unwrap();

    assert_eq!(*log.borrow(), vec!["will_receive_props", "should_update"]);
    assert_eq!(handle.props().unwrap().get_str("label"), Some("b"));
    // node still shows the old render
    assert_eq!(ctx.renderer().text_content(root_node(&ctx, container)), "a");
}

#[test]
fn test_set_state_after_unmount_fails() {
    let (mut ctx, container) = setup();
    let heading = toggle_heading();

    ctx.render(&create_element(&heading, None, vec![]), &container)
        .unwrap();
    let handle = root_handle(&ctx, container);

    ctx.unmount_root(&container).unwrap();
    assert_eq!(handle.lifecycle(), Lifecycle::Destroyed);

    match ctx.set_state(&handle, Props::new().with("large", true)) {
        Err(ReconcileError::InstanceUnmounted { component }) => assert_eq!(component, "Heading"),
        other => panic!("Expected InstanceUnmounted, got {:?}", other),
    }
}

#[test]
fn test_replaced_composite_is_destroyed() {
    let (mut ctx, container) = setup();
    let heading = toggle_heading();

    ctx.render(&create_element(&heading, None, vec![]), &container)
        .unwrap();
    let handle = root_handle(&ctx, container);

    // same tag as the rendered child, different type
    ctx.render(&text("p", "plain"), &container).unwrap();

    assert_eq!(handle.lifecycle(), Lifecycle::Destroyed);
    assert!(ctx.root_instance(&container).and_then(Instance::as_host).is_some());
    assert_eq!(ctx.renderer().live_node_count(), 1);
}

#[test]
fn test_builder_without_render_is_rejected() {
    match ComponentType::builder("Broken").build() {
        Err(ReconcileError::ComponentContractViolation { component, .. }) => {
            assert_eq!(component, "Broken")
        }
        other => panic!("Expected ComponentContractViolation, got {:?}", other.map(|c| c.name().to_string())),
    }
}
