//! Runtime stacks: typed identifiers and the catalog of supported versions.
//!
//! Identifier enums are closed. An unknown stack value is an error at the
//! point where it is parsed, never a silent fallback.

#[macro_use]
pub mod id_enum_macro;

pub mod catalog;
pub mod runtime_stack;

pub use catalog::{
    CatalogError, GitHubActionSettings, MajorVersion, MinorVersion, RuntimeSettings,
    StackCatalog, StackFilter, StackSettings, WebAppStack,
};
pub use runtime_stack::{JavaContainer, Os, RuntimeStack};
