//! Centralized limits for the extraction pipeline.
//!
//! Declaration files are usually small, but generated inputs can nest types
//! arbitrarily deep. These bounds keep the recursive passes off the stack
//! limit and turn pathological inputs into diagnostics instead of hangs.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum recursion depth for the declaration parser.
///
/// Nested type syntax (`Promise<Promise<...>>`, parenthesized types, object
/// type literals) recurses once per level. The parser reports
/// `UNEXPECTED_TOKEN` and bails out of the current production when exceeded.
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;

/// Maximum recursion depth for type normalization.
///
/// Union flattening and tuple validation walk the type tree. Past this depth
/// the normalizer keeps the remaining subtree unnormalized.
pub const MAX_NORMALIZE_DEPTH: u32 = 500;

/// Maximum length of an inheritance chain followed during member resolution.
///
/// Cycles are detected separately by path tracking; this bounds legitimate
/// but absurdly deep `extends` chains.
pub const MAX_INHERITANCE_DEPTH: u32 = 128;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Pre-allocation size for syntax nodes, roughly one node per 20 characters
/// of source. Actual allocation is `min(estimate, MAX_NODE_PREALLOC)`.
pub const MAX_NODE_PREALLOC: usize = 1_000_000;

/// Inline capacity for member and element lists. Most parameter lists,
/// union shapes, and tuple types fit without heap allocation.
pub const TYPE_LIST_INLINE: usize = 8;
