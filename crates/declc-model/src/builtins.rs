//! Names resolvable without a declaration in scope.
//!
//! Declaration inputs routinely reference the host's standard library without
//! shipping its definitions. References to these names resolve as-is instead
//! of producing an unresolved-reference error.

/// Global types assumed to exist. Sorted for binary search.
pub const KNOWN_GLOBAL_TYPES: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "AsyncIterable",
    "AsyncIterator",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "Float32Array",
    "Float64Array",
    "Function",
    "Generator",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Iterable",
    "IterableIterator",
    "Iterator",
    "Map",
    "Number",
    "Object",
    "Omit",
    "Partial",
    "Pick",
    "Promise",
    "PromiseLike",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Record",
    "RegExp",
    "Required",
    "Set",
    "String",
    "Symbol",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "WeakMap",
    "WeakSet",
];

/// Global values `typeof` may query without a declaration. Sorted.
pub const TYPE_QUERY_GLOBALS: &[&str] = &[
    "clearInterval",
    "clearTimeout",
    "setInterval",
    "setTimeout",
];

pub fn is_known_global_type(name: &str) -> bool {
    KNOWN_GLOBAL_TYPES.binary_search(&name).is_ok()
}

pub fn is_type_query_global(name: &str) -> bool {
    TYPE_QUERY_GLOBALS.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted_for_binary_search() {
        assert!(KNOWN_GLOBAL_TYPES.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(TYPE_QUERY_GLOBALS.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(is_known_global_type("Promise"));
        assert!(!is_known_global_type("promise"));
        assert!(is_type_query_global("setTimeout"));
        assert!(!is_type_query_global("SetTimeout"));
        assert!(!is_type_query_global("requestAnimationFrame"));
    }
}
