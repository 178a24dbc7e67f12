use crate::compose::compose;
use crate::error::InvalidRange;
use crate::types::{Annotation, AnnotationOptions, Offset};
use smol_str::SmolStr;
use std::fmt;
use std::sync::OnceLock;

/// A text plus the annotations to apply to it.
///
/// Markup is produced lazily by [`Document::render`] and kept until the next
/// annotation is added. Annotation order matters: it decides nesting when
/// annotations share a position.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    len: usize,
    annotations: Vec<Annotation>,
    markup: OnceLock<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            len,
            annotations: Vec::new(),
            markup: OnceLock::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Add an annotation starting at `start`.
    ///
    /// Without an explicit end the annotation is zero-width. Fractional
    /// positions are truncated toward zero before they are checked. On error
    /// the document is left untouched.
    pub fn add(
        &mut self,
        tag: impl Into<SmolStr>,
        start: impl Into<Offset>,
        options: AnnotationOptions,
    ) -> Result<(), InvalidRange> {
        let start = start.into().get();
        let end = options.end.map_or(start, Offset::get);
        InvalidRange::check(start, end, self.len)?;

        // Both bounds are in 0..=len now
        let annotation = Annotation {
            tag: tag.into(),
            start: start as usize,
            end: end as usize,
            attributes: options.attributes,
        };
        self.push(annotation);
        Ok(())
    }

    /// Add an attribute-less annotation covering `start..end`.
    pub fn add_range(
        &mut self,
        tag: impl Into<SmolStr>,
        start: impl Into<Offset>,
        end: impl Into<Offset>,
    ) -> Result<(), InvalidRange> {
        self.add(tag, start, AnnotationOptions::until(end))
    }

    /// Add an already-built annotation, checked the same way as [`Document::add`].
    pub fn add_annotation(&mut self, annotation: Annotation) -> Result<(), InvalidRange> {
        let start = Offset::from(annotation.start).get();
        let end = Offset::from(annotation.end).get();
        InvalidRange::check(start, end, self.len)?;
        self.push(annotation);
        Ok(())
    }

    fn push(&mut self, annotation: Annotation) {
        tracing::debug!(
            tag = %annotation.tag,
            start = annotation.start,
            end = annotation.end,
            count = self.annotations.len() + 1,
            "annotation added"
        );
        self.annotations.push(annotation);
        self.markup.take();
    }

    /// The text with every annotation applied.
    pub fn render(&self) -> &str {
        if let Some(markup) = self.markup.get() {
            tracing::trace!("markup cache hit");
            return markup;
        }
        self.markup.get_or_init(|| {
            tracing::trace!(annotations = self.annotations.len(), "composing markup");
            compose(&self.text, &self.annotations)
        })
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}
