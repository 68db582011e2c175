pub mod component;
pub mod config;
pub mod element;
pub mod error;
pub mod host;
pub mod props;
pub mod result;
pub mod validate;
pub mod visitor;

pub use component::*;
pub use config::*;
pub use element::*;
pub use error::*;
pub use host::*;
pub use props::*;
pub use result::*;
pub use validate::*;
pub use visitor::*;
