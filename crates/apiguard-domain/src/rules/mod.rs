//! The built-in rule catalog.
//!
//! One module per rule. Each module exposes `rule()` returning its
//! definition; `catalog()` lists them in the order presets enable them.

use crate::registry::Rule;

mod boolean_parameter;
mod documentation;
mod error_shape;
mod escape_hatch;
mod feature_hygiene;
mod leaky_borrow;
mod over_generic;
mod surface_minimality;
pub(crate) mod utils;


pub fn catalog() -> Vec<Rule> {
    vec![
        surface_minimality::rule(),
        over_generic::rule(),
        boolean_parameter::rule(),
        leaky_borrow::rule(),
        error_shape::rule(),
        escape_hatch::rule(),
        feature_hygiene::rule(),
        documentation::rule(),
    ]
}
