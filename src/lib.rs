//! jsdoc-extract — pull structured documentation out of JSDoc-annotated
//! JavaScript without parsing it.
//!
//! [`extract`] scans source text for `/** ... */` blocks, guesses what the
//! following line of code declares, and interprets the comment's tags into
//! a [`DescriptionRecord`] per block.
//!
//! ```
//! let records = jsdoc_extract::extract(
//!     "/**\n * Add numbers\n * @param {int} a\n */\nexports.add = function(a, b = 1) {};",
//! );
//! assert_eq!(records[0].name, "exports.add");
//! assert!(records[0].can_attach);
//! ```

pub mod model;
pub mod parser;
pub mod render;

pub use model::{DescriptionRecord, Parameter, SignatureContext};
pub use parser::extract;
