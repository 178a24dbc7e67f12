use super::AnnotationOutput;
use crate::escape::{write_escaped_attribute, write_escaped_text};
use crate::types::Annotation;
use markdown_weaver_escape::StrWrite;

/// Writes annotations as start/end tags and escapes everything in between.
pub struct HtmlOutput<W: StrWrite> {
    writer: W,
}

impl<W: StrWrite> HtmlOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: StrWrite> AnnotationOutput for HtmlOutput<W> {
    type Error = W::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        write_escaped_text(&mut self.writer, text)
    }

    fn open(&mut self, annotation: &Annotation) -> Result<(), Self::Error> {
        self.writer.write_str("<")?;
        self.writer.write_str(&annotation.tag)?;
        for (key, value) in annotation.attributes.iter() {
            self.writer.write_str(" ")?;
            self.writer.write_str(key)?;
            self.writer.write_str("=\"")?;
            write_escaped_attribute(&mut self.writer, value)?;
            self.writer.write_str("\"")?;
        }
        self.writer.write_str(">")
    }

    fn close(&mut self, annotation: &Annotation) -> Result<(), Self::Error> {
        self.writer.write_str("</")?;
        self.writer.write_str(&annotation.tag)?;
        self.writer.write_str(">")
    }
}
