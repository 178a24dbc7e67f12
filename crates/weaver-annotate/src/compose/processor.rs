use super::AnnotationOutput;
use crate::types::Annotation;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// Annotation indices keyed by character position.
type PositionIndex = BTreeMap<usize, Vec<usize>>;

/// Drive `output` through `text` with `annotations` applied, never letting two
/// tags overlap.
///
/// The text is cut into segments at every annotation start and end. Between
/// segments, annotations due to close are closed; anything opened after them
/// is closed first and reopened straight after. Annotations then open in the
/// order they were given, so earlier ones end up outermost. Zero-width
/// annotations open and close in place.
///
/// Positions count characters. Positions past the end of the text are clamped
/// to it.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(bytes = text.len(), annotations = annotations.len())
)]
pub fn compose_into<O: AnnotationOutput>(
    text: &str,
    annotations: &[Annotation],
    output: &mut O,
) -> Result<(), O::Error> {
    let len = text.chars().count();

    let spans: Vec<Range<usize>> = annotations
        .iter()
        .map(|a| {
            let start = a.start.min(len);
            start..a.end.clamp(start, len)
        })
        .collect();

    let mut starts_at = PositionIndex::new();
    let mut ends_at = PositionIndex::new();
    for (idx, span) in spans.iter().enumerate() {
        let (start, end) = (span.start, span.end);
        starts_at.entry(start).or_default().push(idx);
        // Zero-width annotations close as soon as they open, never via the stack
        if start != end {
            ends_at.entry(end).or_default().push(idx);
        }
    }

    let boundaries: Vec<usize> = starts_at
        .keys()
        .chain(ends_at.keys())
        .copied()
        .chain([0, len])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let offsets = byte_offsets(text, &boundaries);
    let mut segments: Vec<&str> = offsets
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| &text[w[0]..w[1]])
        .collect();
    // Empty text still gets one pass so annotations at 0 render
    if segments.is_empty() {
        segments.push("");
    }

    let mut stack: Vec<usize> = Vec::new();
    let mut cursor = 0;

    for segment in segments {
        for &target in ends_at.get(&cursor).into_iter().flatten() {
            let Some(depth) = stack.iter().rposition(|&open| open == target) else {
                continue;
            };

            // Everything from the target up is closed, top first
            let closed: Vec<usize> = stack.drain(depth..).collect();
            for &idx in closed.iter().rev() {
                output.close(&annotations[idx])?;
            }

            if closed.len() > 1 {
                tracing::trace!(
                    position = cursor,
                    tag = %annotations[target].tag,
                    reopened = closed.len() - 1,
                    "close forced reopen"
                );
            }

            // Reopen the ones that were only in the way, innermost last
            for &idx in &closed[1..] {
                output.open(&annotations[idx])?;
                stack.push(idx);
            }
        }

        open_at(cursor, &starts_at, annotations, &spans, &mut stack, output)?;

        output.write_text(segment)?;
        cursor += segment.chars().count();
    }

    while let Some(idx) = stack.pop() {
        output.close(&annotations[idx])?;
    }

    // Only zero-width annotations can start at the very end, and the loop
    // above never reaches that position unless the text is empty.
    if cursor > 0 {
        open_at(cursor, &starts_at, annotations, &spans, &mut stack, output)?;
    }

    Ok(())
}

fn open_at<O: AnnotationOutput>(
    position: usize,
    starts_at: &PositionIndex,
    annotations: &[Annotation],
    spans: &[Range<usize>],
    stack: &mut Vec<usize>,
    output: &mut O,
) -> Result<(), O::Error> {
    for &idx in starts_at.get(&position).into_iter().flatten() {
        let annotation = &annotations[idx];
        output.open(annotation)?;
        if !spans[idx].is_empty() {
            stack.push(idx);
        } else {
            output.close(annotation)?;
        }
    }
    Ok(())
}

/// Map ascending character positions to byte offsets in `text`.
fn byte_offsets(text: &str, positions: &[usize]) -> Vec<usize> {
    let mut char_starts = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain([text.len()])
        .enumerate();

    positions
        .iter()
        .map(|&pos| {
            char_starts
                .find(|&(char_idx, _)| char_idx == pos)
                .map(|(_, byte)| byte)
                .unwrap_or(text.len())
        })
        .collect()
}
