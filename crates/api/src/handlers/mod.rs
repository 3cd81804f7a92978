//! Request handlers, grouped by resource.

pub mod element;
pub mod import;
pub mod layer;
pub mod map;
pub mod menus;
pub mod site;
pub mod viewport;
