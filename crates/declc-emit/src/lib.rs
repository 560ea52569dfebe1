//! Deterministic serialization of the IDM.
//!
//! Field order is fixed by the model's struct definitions and every
//! collection preserves declaration order, so identical documents always
//! serialize to byte-identical output. `Stable` mode additionally strips
//! source locations, which is what golden-file tests compare against.

use declc_model::{IdmDocument, IdmSymbol, IdmUnit, SymbolDef};
use std::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EmitMode {
    /// Everything, source locations included.
    #[default]
    Full,
    /// Omit source locations for position-independent comparison.
    Stable,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct EmitOptions {
    pub mode: EmitMode,
    pub pretty: bool,
}

impl EmitOptions {
    pub fn stable() -> EmitOptions {
        EmitOptions {
            mode: EmitMode::Stable,
            pretty: false,
        }
    }
}

#[derive(Debug)]
pub struct EmitError(serde_json::Error);

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to serialize the IDM: {}", self.0)
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for EmitError {
    fn from(error: serde_json::Error) -> EmitError {
        EmitError(error)
    }
}

/// Serialize a document according to `options`.
pub fn emit_document(document: &IdmDocument, options: &EmitOptions) -> Result<String, EmitError> {
    let output = match options.mode {
        EmitMode::Full => serialize(document, options.pretty)?,
        EmitMode::Stable => {
            let mut stripped = document.clone();
            strip_locations(&mut stripped);
            serialize(&stripped, options.pretty)?
        }
    };
    Ok(output)
}

/// Serialize a single unit; used for per-file output.
pub fn emit_unit(unit: &IdmUnit, options: &EmitOptions) -> Result<String, EmitError> {
    match options.mode {
        EmitMode::Full => serialize(unit, options.pretty),
        EmitMode::Stable => {
            let mut stripped = unit.clone();
            strip_unit(&mut stripped);
            serialize(&stripped, options.pretty)
        }
    }
}

fn serialize<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, EmitError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn strip_locations(document: &mut IdmDocument) {
    for unit in &mut document.units {
        strip_unit(unit);
    }
}

fn strip_unit(unit: &mut IdmUnit) {
    for symbol in &mut unit.symbols {
        strip_symbol(symbol);
    }
}

fn strip_symbol(symbol: &mut IdmSymbol) {
    symbol.location = None;
    match &mut symbol.def {
        SymbolDef::Namespace(namespace) => {
            for member in &mut namespace.members {
                strip_symbol(member);
            }
        }
        SymbolDef::Module(module) => {
            for member in &mut module.members {
                strip_symbol(member);
            }
        }
        SymbolDef::Interface(_)
        | SymbolDef::Class(_)
        | SymbolDef::Enum(_)
        | SymbolDef::TypeAlias(_)
        | SymbolDef::Function(_)
        | SymbolDef::Constant(_) => {}
    }
}
