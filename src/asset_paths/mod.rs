//! Helpers for turning asset URLs found in markup into paths under the asset root.
//!
//! Filtering of non-local references and the actual root join live in separate submodules
//! so each can be tested on its own.

mod filters;
mod resolve;

pub use filters::is_external_reference;
pub use resolve::{resolve, strip_query_and_fragment};
