//! An in-memory render target for the Arbor reconciler.
//!
//! [`MemoryDom`] implements [`HostRenderer`](arbor_common::HostRenderer) over
//! an arena of nodes, records every operation it performs and can dispatch
//! events to the handlers that were set as properties.

pub mod config;
pub mod dom;
pub mod html;
pub mod snapshot;
pub mod tags;

pub use config::DomConfig;
pub use dom::{DomOp, MemoryDom, NodeData, NodeId, CONTAINER_TAG};
pub use html::HtmlOptions;
pub use snapshot::DomSnapshot;
pub use tags::{is_html_tag, is_void_tag};
