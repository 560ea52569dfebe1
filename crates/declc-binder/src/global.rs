//! Cross-unit lookup built once every unit is collected.

use crate::bind::{DeclKind, Declaration, UnitBindings};
use rustc_hash::FxHashMap;

/// What a module specifier resolved to.
#[derive(Debug, PartialEq, Eq)]
pub enum ModuleTarget<'t> {
    /// Another input unit, by index.
    Unit(usize),
    /// Ambient modules of this name, by declaring unit index.
    Ambient(&'t [usize]),
}

/// Read-only view over every unit's bindings.
///
/// Declaration inputs share one global scope: a root declaration of any unit
/// is visible to type references in every other unit. Lookup answers carry
/// the declaring unit index so diagnostics and qualified names stay per-unit.
pub struct GlobalTable<'a> {
    units: &'a [UnitBindings],
    by_stem: FxHashMap<String, usize>,
    root_names: FxHashMap<&'a str, Vec<usize>>,
    ambient: FxHashMap<&'a str, Vec<usize>>,
}

impl<'a> GlobalTable<'a> {
    pub fn build(units: &'a [UnitBindings]) -> GlobalTable<'a> {
        let mut by_stem = FxHashMap::default();
        let mut root_names: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
        let mut ambient: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
        for (index, unit) in units.iter().enumerate() {
            by_stem.entry(file_stem(&unit.file).to_string()).or_insert(index);
            for (name, decl) in &unit.root.declarations {
                root_names.entry(name.as_str()).or_default().push(index);
                if decl.kind == DeclKind::Module {
                    ambient.entry(name.as_str()).or_default().push(index);
                }
            }
        }
        GlobalTable {
            units,
            by_stem,
            root_names,
            ambient,
        }
    }

    pub fn units(&self) -> &'a [UnitBindings] {
        self.units
    }

    pub fn unit(&self, index: usize) -> &'a UnitBindings {
        &self.units[index]
    }

    /// Root declarations of `name` across all units, in input order.
    pub fn declarations_named(&self, name: &str) -> Vec<(usize, &'a Declaration)> {
        let Some(indices) = self.root_names.get(name) else {
            return Vec::new();
        };
        indices
            .iter()
            .filter_map(|&index| {
                self.units[index].root.get(name).map(|decl| (index, decl))
            })
            .collect()
    }

    pub fn has_root(&self, name: &str) -> bool {
        self.root_names.contains_key(name)
    }

    /// Resolve an import or re-export specifier. Relative specifiers match
    /// input units by file stem; bare specifiers match ambient module names.
    pub fn resolve_specifier(&self, specifier: &str) -> Option<ModuleTarget<'_>> {
        if specifier.starts_with('.') {
            return self
                .by_stem
                .get(file_stem(specifier))
                .map(|&index| ModuleTarget::Unit(index));
        }
        self.ambient
            .get(specifier)
            .map(|indices| ModuleTarget::Ambient(indices))
    }
}

/// `src/api.d.ts` and `./api` both reduce to `api`.
fn file_stem(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    for suffix in [".d.ts", ".ts"] {
        if let Some(stem) = name.strip_suffix(suffix) {
            return stem;
        }
    }
    name
}
