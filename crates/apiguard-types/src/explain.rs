//! Explain registry for rules and codes.
//!
//! Maps rule IDs and finding codes to human-readable explanations with
//! remediation guidance. This is where each rule's rationale and suggested
//! fix live; the engine itself only emits the short per-finding message.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after API sketches.
    pub examples: ExamplePair,
}

/// Before and after API sketches.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// A surface shape that would trigger a finding.
    pub before: &'static str,
    /// A surface shape that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    // Try rule_id first, then code. Codes resolve to their owning rule's entry.
    match identifier {
        ids::RULE_SURFACE_MINIMALITY | ids::CODE_INTERNAL_PATTERN_EXPORTED => {
            Some(explain_surface_minimality())
        }
        ids::RULE_SURFACE_OVER_GENERIC
        | ids::CODE_EXCESS_PARAMS
        | ids::CODE_EXCESS_GENERIC_BOUNDS => Some(explain_over_generic()),
        ids::RULE_API_BOOLEAN_PARAMETER | ids::CODE_BOOL_PARAM => {
            Some(explain_boolean_parameter())
        }
        ids::RULE_API_LEAKY_BORROW | ids::CODE_UNJUSTIFIED_BORROW => Some(explain_leaky_borrow()),
        ids::RULE_API_ERROR_SHAPE | ids::CODE_TEXTUAL_ERROR => Some(explain_error_shape()),
        ids::RULE_API_ESCAPE_HATCH | ids::CODE_MISSING_JUSTIFICATION => {
            Some(explain_escape_hatch())
        }
        ids::RULE_FEATURES_HYGIENE
        | ids::CODE_UNDECLARED_CAPABILITY
        | ids::CODE_ACCIDENTAL_DEFAULT_ON => Some(explain_feature_hygiene()),
        ids::RULE_DOCS_CONTRACT | ids::CODE_MISSING_CONTRACT => Some(explain_docs_contract()),
        ids::RULE_COMPAT_SURFACE => Some(explain_compat_surface()),
        ids::RULE_ENGINE_FAULT | ids::CODE_RULE_PANIC => Some(explain_engine_fault()),
        _ => None,
    }
}

/// List all known rule IDs.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_SURFACE_MINIMALITY,
        ids::RULE_SURFACE_OVER_GENERIC,
        ids::RULE_API_BOOLEAN_PARAMETER,
        ids::RULE_API_LEAKY_BORROW,
        ids::RULE_API_ERROR_SHAPE,
        ids::RULE_API_ESCAPE_HATCH,
        ids::RULE_FEATURES_HYGIENE,
        ids::RULE_DOCS_CONTRACT,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_INTERNAL_PATTERN_EXPORTED,
        ids::CODE_EXCESS_PARAMS,
        ids::CODE_EXCESS_GENERIC_BOUNDS,
        ids::CODE_BOOL_PARAM,
        ids::CODE_UNJUSTIFIED_BORROW,
        ids::CODE_TEXTUAL_ERROR,
        ids::CODE_MISSING_JUSTIFICATION,
        ids::CODE_UNDECLARED_CAPABILITY,
        ids::CODE_ACCIDENTAL_DEFAULT_ON,
        ids::CODE_MISSING_CONTRACT,
    ]
}

// --- Rule-level explanations ---

fn explain_surface_minimality() -> Explanation {
    Explanation {
        title: "Surface Minimality",
        description: "\
Detects exported items whose paths match a caller-configured \"should stay
internal\" pattern.

Every public item is a commitment: removing or changing it later is a breaking
change. Helper modules, low-level plumbing, and types intended for internal
wiring routinely leak into the surface through a forgotten visibility marker,
and every leak narrows the room the library has to evolve.",
        remediation: "\
Reduce the item's visibility (crate-private or private), or re-export it under
a deliberate public path. If the item genuinely belongs to the surface, remove
the matching pattern from the rule configuration.",
        examples: ExamplePair {
            before: "pub mod internal;          // matches pattern `*::internal*`
pub fn raw_buffer_ptr() ...",
            after: "mod internal;              // plumbing stays private
pub fn buffer() -> Buffer  // deliberate, documented surface",
        },
    }
}

fn explain_over_generic() -> Explanation {
    Explanation {
        title: "Over-Generic Surface",
        description: "\
Detects public functions whose parameter count or total generic-bound count
exceeds a caller-configured threshold.

Long parameter lists and heavily-bounded generics make call sites hard to read
and trap the library into signatures it cannot simplify later. Thresholds are
project-specific, so this rule stays silent until the caller sets them.",
        remediation: "\
Group related parameters into a configuration struct or builder, and prefer a
small number of meaningful bounds over a wall of trait constraints.",
        examples: ExamplePair {
            before: "pub fn connect<A, B, C, D>(host: A, port: B, retries: C, log: D) ...",
            after: "pub fn connect(options: ConnectOptions) -> Result<Conn, ConnectError>",
        },
    }
}

fn explain_boolean_parameter() -> Explanation {
    Explanation {
        title: "Boolean Parameter",
        description: "\
Detects public functions taking a parameter of a two-valued type.

A bare boolean at a call site (`render(true, false)`) carries no meaning
without reading the signature. Two-valued parameters also tend to grow: the
third variant arrives and the boolean becomes a breaking change.",
        remediation: "\
Replace the boolean with a dedicated two-variant enum or an options struct so
the call site names the behavior.",
        examples: ExamplePair {
            before: "pub fn render(doc: &Document, compact: bool)",
            after: "pub enum Layout { Compact, Full }
pub fn render(doc: &Document, layout: Layout)",
        },
    }
}

fn explain_leaky_borrow() -> Explanation {
    Explanation {
        title: "Leaky Borrow",
        description: "\
Detects public functions whose parameters or return value expose a
borrow-scoped reference without a justification annotation.

Returning borrows ties the caller's control flow to the callee's internal
storage. Sometimes that is exactly right (zero-copy accessors), but it should
be a recorded decision, not an accident of the first implementation.",
        remediation: "\
Either return owned data, or attach a borrow justification note to the
signature documenting why the borrow is part of the contract.",
        examples: ExamplePair {
            before: "pub fn name(&self) -> &str   // no recorded justification",
            after: "/// Borrows from the interned name table; zero-copy by design.
pub fn name(&self) -> &str",
        },
    }
}

fn explain_error_shape() -> Explanation {
    Explanation {
        title: "Error Shape",
        description: "\
Detects public fallible operations whose error descriptor is an unstructured
text type rather than a named error classification.

Stringly-typed errors cannot be matched on, carry no stable discriminants, and
force consumers into substring checks that break on the next wording change.",
        remediation: "\
Introduce a dedicated error enum (or struct with a kind accessor) and return
that instead of a bare string.",
        examples: ExamplePair {
            before: "pub fn parse(input: &str) -> Result<Config, String>",
            after: "pub fn parse(input: &str) -> Result<Config, ParseError>",
        },
    }
}

fn explain_escape_hatch() -> Explanation {
    Explanation {
        title: "Escape Hatch Justification",
        description: "\
Detects items that bypass normal safety guarantees without an accompanying
justification text.

Low-level escapes are sometimes necessary, but each one is a place where the
library's invariants are enforced by prose rather than the compiler. An
undocumented escape hatch cannot be reviewed or audited.",
        remediation: "\
Record why the escape is needed, what invariant the caller must uphold, and
why a safe alternative is not used.",
        examples: ExamplePair {
            before: "pub unsafe fn from_raw(ptr: *mut Inner) -> Handle   // no justification",
            after: "/// SAFETY: `ptr` must originate from `Handle::into_raw`; ownership transfers.
pub unsafe fn from_raw(ptr: *mut Inner) -> Handle",
        },
    }
}

fn explain_feature_hygiene() -> Explanation {
    Explanation {
        title: "Feature Gate Hygiene",
        description: "\
Detects items gated by a capability expression that references an undeclared
capability, or a default-on capability not acknowledged by the rule's allow
list.

An undeclared capability means the gate can never be satisfied (or the
snapshot and build definition have drifted apart). A default-on capability
silently widens the default surface; it should be a deliberate choice.",
        remediation: "\
Declare every referenced capability in the feature universe. For capabilities
that are intentionally on by default, add them to the rule's allow list.",
        examples: ExamplePair {
            before: "# gate references `tracing`, never declared
pub fn traced_call() ...  # cfg(feature = \"tracing\")",
            after: "[features]
tracing = []   # declared, default off",
        },
    }
}

fn explain_docs_contract() -> Explanation {
    Explanation {
        title: "Documented Contract",
        description: "\
Detects effectively-public items without a documented contract.

A public item without documented behavior has no contract at all: consumers
depend on whatever the current implementation happens to do, and every change
is potentially breaking.",
        remediation: "\
Document what the item guarantees: inputs, outputs, error conditions, and any
invariants the caller must hold.",
        examples: ExamplePair {
            before: "pub fn flush(&mut self) -> Result<(), FlushError>   // undocumented",
            after: "/// Writes all buffered records, blocking until the sink acknowledges them.
/// Returns `FlushError::Closed` if the sink has shut down.
pub fn flush(&mut self) -> Result<(), FlushError>",
        },
    }
}

fn explain_compat_surface() -> Explanation {
    Explanation {
        title: "Surface Compatibility",
        description: "\
Findings mapped from the compatibility diff between a baseline and a candidate
snapshot. Each finding corresponds to one classified delta: removals and
narrowed guarantees are major, additive growth is minor, non-surface changes
are patch or none.",
        remediation: "\
Major deltas require a major version bump or a revert. Review rename
candidates explicitly; the engine never merges an add/remove pair on its own.",
        examples: ExamplePair {
            before: "pub fn fetch(url: &str) -> Response      // baseline",
            after: "pub fn fetch(req: Request) -> Response   // signature_changed, major",
        },
    }
}

fn explain_engine_fault() -> Explanation {
    Explanation {
        title: "Rule Fault",
        description: "\
A rule's check raised an unexpected failure while evaluating one item. The
fault is contained: the rest of the run completes, and the failing (rule,
item) pair is reported as this synthetic finding.",
        remediation: "\
This indicates a bug in the named rule, not in the reviewed surface. Report it
with the rule id and item path from the finding message.",
        examples: ExamplePair {
            before: "engine.rule_fault: rule 'custom.check' failed while checking 'pkg::item'",
            after: "(fix or disable the faulting rule)",
        },
    }
}
