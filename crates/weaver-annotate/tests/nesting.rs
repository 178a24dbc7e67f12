// Randomized checks that composed markup always nests properly and carries
// exactly the text it was given.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use weaver_annotate::{AnnotationOptions, Document, escape_text};

const TAGS: &[&str] = &["a", "b", "em", "i", "span"];
const ALPHABET: &[char] = &['x', 'y', 'z', ' ', '<', '>', '&', '"', 'é', 'ß', '字'];

#[derive(Debug, PartialEq)]
enum Piece {
    Open(String),
    Close(String),
    Text(String),
}

/// Split composed markup into tags and (still escaped) text runs.
fn tokenize(markup: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut rest = markup;
    while !rest.is_empty() {
        if let Some(tag) = rest.strip_prefix('<') {
            let end = tag.find('>').expect("unterminated tag");
            let inner = &tag[..end];
            if let Some(name) = inner.strip_prefix('/') {
                pieces.push(Piece::Close(name.to_string()));
            } else {
                let name = inner.split(' ').next().unwrap_or_default();
                pieces.push(Piece::Open(name.to_string()));
            }
            rest = &tag[end + 1..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            pieces.push(Piece::Text(rest[..end].to_string()));
            rest = &rest[end..];
        }
    }
    pieces
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

fn random_document(rng: &mut StdRng) -> (Document, Vec<(String, usize, usize)>) {
    let len = rng.random_range(0..24);
    let text: String = (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect();
    let mut doc = Document::new(text);
    let mut spans = Vec::new();

    for _ in 0..rng.random_range(0..8) {
        let tag = TAGS[rng.random_range(0..TAGS.len())];
        let start = rng.random_range(0..=len);
        let end = if rng.random_bool(0.15) {
            start
        } else {
            rng.random_range(start..=len)
        };
        let opts = AnnotationOptions::until(end).attribute("data-n", spans.len().to_string());
        doc.add(tag, start, opts).unwrap();
        spans.push((tag.to_string(), start, end));
    }
    (doc, spans)
}

#[test]
fn test_random_annotations_nest_and_cover_text() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..500 {
        let (doc, spans) = random_document(&mut rng);
        let markup = doc.render();
        let pieces = tokenize(markup);

        let mut stack: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut position = 0;

        for piece in &pieces {
            match piece {
                Piece::Open(name) => stack.push(name.clone()),
                Piece::Close(name) => {
                    let top = stack.pop();
                    assert_eq!(top.as_deref(), Some(name.as_str()), "round {round}: {markup}");
                }
                Piece::Text(escaped) => {
                    text.push_str(escaped);
                    // Every character sits inside exactly the spans covering it
                    let mut open: Vec<&str> = stack.iter().map(String::as_str).collect();
                    open.sort_unstable();
                    for _ in unescape(escaped).chars() {
                        let mut expected: Vec<&str> = spans
                            .iter()
                            .filter(|(_, s, e)| *s <= position && position < *e)
                            .map(|(t, _, _)| t.as_str())
                            .collect();
                        expected.sort_unstable();
                        assert_eq!(open, expected, "round {round} at {position}: {markup}");
                        position += 1;
                    }
                }
            }
        }

        assert!(stack.is_empty(), "round {round}: unclosed tags in {markup}");
        assert_eq!(text, escape_text(doc.text()), "round {round}");

        // Zero-width spans each produce one empty element
        let empty_pairs = pieces
            .windows(2)
            .filter(|w| matches!((&w[0], &w[1]), (Piece::Open(a), Piece::Close(b)) if a == b))
            .count();
        let zero_width = spans.iter().filter(|(_, s, e)| s == e).count();
        assert!(empty_pairs >= zero_width, "round {round}: {markup}");
    }
}

#[test]
fn test_render_from_many_threads() {
    let mut doc = Document::new("shared across threads");
    doc.add_range("b", 0, 6).unwrap();
    doc.add_range("i", 3, 13).unwrap();
    let expected = "<b>sha<i>red</i></b><i> across</i> threads";

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| assert_eq!(doc.render(), expected));
        }
    });
}
