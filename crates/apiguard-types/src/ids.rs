//! Stable identifiers for rules and finding codes.
//!
//! `rule_id` is a dotted namespace. `code` is a short snake_case discriminator.
//! IDs are referenced by suppression lists and must never be reused.

// Rules
pub const RULE_SURFACE_MINIMALITY: &str = "surface.minimality";
pub const RULE_SURFACE_OVER_GENERIC: &str = "surface.over_generic";
pub const RULE_API_BOOLEAN_PARAMETER: &str = "api.boolean_parameter";
pub const RULE_API_LEAKY_BORROW: &str = "api.leaky_borrow";
pub const RULE_API_ERROR_SHAPE: &str = "api.error_shape";
pub const RULE_API_ESCAPE_HATCH: &str = "api.escape_hatch";
pub const RULE_FEATURES_HYGIENE: &str = "features.hygiene";
pub const RULE_DOCS_CONTRACT: &str = "docs.contract";

// Codes: surface.minimality
pub const CODE_INTERNAL_PATTERN_EXPORTED: &str = "internal_pattern_exported";

// Codes: surface.over_generic
pub const CODE_EXCESS_PARAMS: &str = "excess_params";
pub const CODE_EXCESS_GENERIC_BOUNDS: &str = "excess_generic_bounds";

// Codes: api.boolean_parameter
pub const CODE_BOOL_PARAM: &str = "bool_param";

// Codes: api.leaky_borrow
pub const CODE_UNJUSTIFIED_BORROW: &str = "unjustified_borrow";

// Codes: api.error_shape
pub const CODE_TEXTUAL_ERROR: &str = "textual_error";

// Codes: api.escape_hatch
pub const CODE_MISSING_JUSTIFICATION: &str = "missing_justification";

// Codes: features.hygiene
pub const CODE_UNDECLARED_CAPABILITY: &str = "undeclared_capability";
pub const CODE_ACCIDENTAL_DEFAULT_ON: &str = "accidental_default_on";

// Codes: docs.contract
pub const CODE_MISSING_CONTRACT: &str = "missing_contract";

// Engine-level: a rule check faulted while running. Synthetic, never registered.
pub const RULE_ENGINE_FAULT: &str = "engine.rule_fault";
pub const CODE_RULE_PANIC: &str = "rule_panic";

// Compatibility findings mapped from diff deltas. Synthetic, never registered.
pub const RULE_COMPAT_SURFACE: &str = "compat.surface";
pub const CODE_ITEM_ADDED: &str = "item_added";
pub const CODE_ITEM_REMOVED: &str = "item_removed";
pub const CODE_SIGNATURE_CHANGED: &str = "signature_changed";
pub const CODE_VISIBILITY_NARROWED: &str = "visibility_narrowed";
pub const CODE_VISIBILITY_WIDENED: &str = "visibility_widened";
pub const CODE_DEPRECATED_ADDED: &str = "deprecated_added";
pub const CODE_DEPRECATED_REMOVED: &str = "deprecated_removed";
pub const CODE_FEATURE_GATE_CHANGED: &str = "feature_gate_changed";
pub const CODE_RENAME_CANDIDATE: &str = "rename_candidate";
