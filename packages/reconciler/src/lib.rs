//! # Arbor Reconciler
//!
//! Turns element descriptions into a tree of live instances and keeps that
//! tree in sync with later descriptions, driving a pluggable host renderer.
//!
//! ## Model
//!
//! - An [`Element`](arbor_common::Element) is an immutable `(type, props)` pair.
//! - An [`Instance`] is the mutable runtime object mounted from an element. It
//!   is either a composite (a user component holding state and exactly one
//!   rendered child) or a host instance (one render-target node plus child
//!   instances).
//! - A [`ReconcileContext`] owns the host renderer and the [`RootRegistry`]
//!   mapping containers to their mounted trees.
//!
//! ## Diffing rule
//!
//! At every tree position the previous and next elements are compared by type
//! only ([`should_update_component`]). Equal types are patched in place,
//! different types are fully unmounted and rebuilt. Children are matched by
//! index; there are no keys, so moving a child to a different position
//! rebuilds it.
//!
//! ## Update model
//!
//! Everything is synchronous. `render` and `set_state` run a complete pass
//! before returning and state updates are never batched: two `set_state`
//! calls are two passes. A failure aborts the pass and leaves the trees in an
//! unspecified state; there is no rollback.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_common::{create_element, Props};
//! use arbor_dom::MemoryDom;
//! use arbor_reconciler::ReconcileContext;
//!
//! let mut dom = MemoryDom::new();
//! let container = dom.create_container();
//! let mut ctx = ReconcileContext::new(dom);
//!
//! let app = create_element("div", Some(&Props::new().with("className", "a")), vec!["hello".into()]);
//! ctx.render(&app, &container)?;
//! ```

pub mod composite;
pub mod config;
pub mod context;
pub mod host;
pub mod instance;
pub mod reconciler;
pub mod registry;

pub use composite::{CompositeHandle, Lifecycle};
pub use config::ReconcilerConfig;
pub use context::ReconcileContext;
pub use host::HostInstance;
pub use instance::Instance;
pub use reconciler::{
    mount_component, perform_update_if_necessary, receive_component, should_update_component,
    unmount_component,
};
pub use registry::{RootId, RootRegistry};
