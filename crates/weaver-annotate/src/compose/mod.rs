//! Turning overlapping annotations into well-nested markup.
//!
//! [`compose_into`] does the interval bookkeeping and drives an
//! [`AnnotationOutput`]; [`HtmlOutput`] is the sink that writes tags.

mod html_output;
mod processor;

pub use html_output::HtmlOutput;
pub use processor::compose_into;

use crate::types::Annotation;
use markdown_weaver_escape::FmtWriter;

pub trait AnnotationOutput {
    type Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
    fn open(&mut self, annotation: &Annotation) -> Result<(), Self::Error>;
    fn close(&mut self, annotation: &Annotation) -> Result<(), Self::Error>;
}

/// Render `text` with `annotations` applied as escaped markup.
pub fn compose(text: &str, annotations: &[Annotation]) -> String {
    let mut markup = String::with_capacity(text.len());
    let mut output = HtmlOutput::new(FmtWriter(&mut markup));
    // Writing into a String won't fail
    let _ = compose_into(text, annotations, &mut output);
    markup
}
