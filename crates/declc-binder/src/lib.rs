//! Declaration collection.
//!
//! The collect phase walks one parsed unit at a time and accumulates its
//! declarations into a [`Container`] tree keyed by name, in first-declaration
//! order. Nothing is resolved here; once every unit is collected, a
//! [`GlobalTable`] over all bindings gives the resolve phase its cross-unit
//! view.

pub mod bind;
pub mod global;

pub use bind::{
    Container, DeclKind, Declaration, ExportAlias, ExportEntry, Import, ImportKind, Reexport,
    UnitBindings, bind_unit,
};
pub use global::{GlobalTable, ModuleTarget};
