//! weaver-annotate: render text with range annotations as well-nested markup.
//!
//! Annotations are tag spans over character positions. They may overlap in
//! any way; the compositor closes and reopens tags at segment boundaries so
//! the output never has crossing tags.
//!
//! ```
//! use weaver_annotate::{AnnotationOptions, Document};
//!
//! let mut doc = Document::new("0123456789");
//! doc.add("a", 1, AnnotationOptions::until(4).attribute("href", "/"))?;
//! doc.add_range("em", 3, 7)?;
//! assert_eq!(
//!     doc.render(),
//!     r#"0<a href="/">12<em>3</em></a><em>456</em>789"#
//! );
//! # Ok::<(), weaver_annotate::InvalidRange>(())
//! ```

pub mod compose;
pub mod document;
pub mod error;
pub mod escape;
pub mod types;

pub use compose::{AnnotationOutput, HtmlOutput, compose, compose_into};
pub use document::Document;
pub use error::InvalidRange;
pub use escape::{escape_attribute, escape_text};
pub use smol_str::SmolStr;
pub use types::{Annotation, AnnotationOptions, Attributes, Offset};
