//! Templates: engine abstraction and registry.
//!
//! - [`TemplateRegistry`] collects template sources from inline strings,
//!   directories and YAML bundles.
//! - [`TemplateEngine`] is the executor the dispatcher talks to;
//!   [`MiniJinjaEngine`] implements it.

mod engine;
mod registry;

pub use engine::{register_filters, MiniJinjaEngine, TemplateEngine};
pub use registry::{
    walk_template_dir, RegistryError, TemplateFile, TemplateRegistry, TemplateSource,
    TEMPLATE_EXTENSIONS,
};
