#![allow(dead_code)]

use arbor_common::{create_element, Element, PropValue, Props};
use arbor_dom::{DomOp, MemoryDom, NodeId};
use arbor_reconciler::ReconcileContext;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

pub fn setup() -> (ReconcileContext<MemoryDom>, NodeId) {
    init_tracing();
    let mut dom = MemoryDom::new();
    let container = dom.create_container();
    (ReconcileContext::new(dom), container)
}

pub fn el(tag: &str, props: Props, children: Vec<PropValue>) -> Element {
    create_element(tag, Some(&props), children)
}

pub fn text(tag: &str, content: &str) -> Element {
    create_element(tag, None, vec![content.into()])
}

/// The single node rendered into `container`
pub fn root_node(ctx: &ReconcileContext<MemoryDom>, container: NodeId) -> NodeId {
    let children = ctx.renderer().children(container);
    assert_eq!(children.len(), 1, "container should hold exactly one node");
    children[0]
}

pub fn created_count(ops: &[DomOp]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, DomOp::Create { .. }))
        .count()
}
