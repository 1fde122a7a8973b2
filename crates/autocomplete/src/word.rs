use std::ops::Range;
use std::sync::Arc;

use crate::buffer::TextBuffer;
use crate::registry::{Registry, Searcher, Trigger};

/// Buffer offsets around the word being completed.
///
/// For a character trigger the bounds start at the trigger itself, so `@wor`
/// yields bounds covering all four characters. Word-boundary matches cover
/// just the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchBounds {
    pub start: usize,
    pub end: usize,
}

impl MatchBounds {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The word under the cursor together with the searcher it routes to.
#[derive(Clone)]
pub struct Extraction {
    pub searcher: Arc<dyn Searcher>,
    pub trigger: Trigger,
    /// Text handed to the searcher, trigger excluded.
    pub query: String,
    pub query_range: Range<usize>,
    pub bounds: MatchBounds,
}

enum Stop {
    Whitespace,
    Trigger(char),
}

/// Finds the word under the cursor and the searcher that should handle it.
///
/// Returns `None` when no searcher applies or the query is shorter than
/// `min_length` characters.
pub fn extract<B>(buffer: &B, registry: &Registry, min_length: usize) -> Option<Extraction>
where
    B: TextBuffer + ?Sized,
{
    let cursor = buffer.cursor().min(buffer.len_chars());

    let mut stop = None;
    let hit = buffer.backward_find_char(cursor, &mut |ch: char| {
        if ch.is_whitespace() {
            stop = Some(Stop::Whitespace);
            return true;
        }
        if registry.get_char(ch).is_some() {
            stop = Some(Stop::Trigger(ch));
            return true;
        }
        false
    });

    let (trigger, query_start, bounds_start) = match (hit, stop) {
        (Some(offset), Some(Stop::Trigger(ch))) => (Trigger::Char(ch), offset + 1, offset),
        (Some(offset), Some(Stop::Whitespace)) => (Trigger::WordBoundary, offset + 1, offset + 1),
        _ => (Trigger::WordBoundary, 0, 0),
    };
    let searcher = registry.get(trigger)?.clone();

    let end = buffer
        .forward_find_char(cursor, &mut char::is_whitespace)
        .unwrap_or_else(|| buffer.len_chars());

    let query = buffer.text(query_start..end);
    if query.chars().count() < min_length {
        log::trace!("autocomplete: query {:?} below minimum length {}", query, min_length);
        return None;
    }

    Some(Extraction {
        searcher,
        trigger,
        query,
        query_range: query_start..end,
        bounds: MatchBounds {
            start: bounds_start,
            end,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::StringBuffer;
    use crate::registry::tests::Fixed;

    fn registry(triggers: &[Trigger]) -> Registry {
        let mut registry = Registry::new();
        for trigger in triggers {
            registry
                .register(Arc::new(Fixed {
                    trigger: *trigger,
                    items: vec![],
                }))
                .unwrap();
        }
        registry
    }

    fn run(marked: &str, triggers: &[Trigger], min_length: usize) -> Option<Extraction> {
        let buffer = StringBuffer::with_cursor_marker(marked);
        extract(&buffer, &registry(triggers), min_length)
    }

    #[test]
    fn trigger_in_the_middle_of_a_sentence() {
        let found = run("hello @wor|ld foo", &[Trigger::Char('@')], 1).unwrap();
        assert_eq!(found.query, "world");
        assert_eq!(found.trigger, Trigger::Char('@'));
        assert_eq!(found.query_range, 7..12);
        assert_eq!(found.bounds, MatchBounds { start: 6, end: 12 });
    }

    #[test]
    fn first_word_goes_to_word_boundary_searcher() {
        let found = run("hel|lo world", &[Trigger::WordBoundary], 1).unwrap();
        assert_eq!(found.query, "hello");
        assert_eq!(found.trigger, Trigger::WordBoundary);
        assert_eq!(found.bounds, MatchBounds { start: 0, end: 5 });
    }

    #[test]
    fn later_word_excludes_leading_whitespace() {
        let found = run("hello wor|ld", &[Trigger::WordBoundary], 1).unwrap();
        assert_eq!(found.query, "world");
        assert_eq!(found.bounds, MatchBounds { start: 6, end: 11 });
    }

    #[test]
    fn whitespace_stops_the_scan_before_an_earlier_trigger() {
        assert!(run("@alice bo|b", &[Trigger::Char('@')], 1).is_none());

        let found = run("@alice bo|b", &[Trigger::Char('@'), Trigger::WordBoundary], 1).unwrap();
        assert_eq!(found.trigger, Trigger::WordBoundary);
        assert_eq!(found.query, "bob");
    }

    #[test]
    fn no_searcher_means_no_extraction() {
        assert!(run("plain wo|rd", &[Trigger::Char('@')], 0).is_none());
        assert!(run("plain|", &[], 0).is_none());
    }

    #[test]
    fn bare_trigger_is_below_minimum_length() {
        assert!(run("hi @|", &[Trigger::Char('@')], 1).is_none());

        let found = run("hi @|", &[Trigger::Char('@')], 0).unwrap();
        assert_eq!(found.query, "");
        assert_eq!(found.bounds, MatchBounds { start: 3, end: 4 });
    }

    #[test]
    fn minimum_length_counts_characters() {
        assert!(run(":ü|", &[Trigger::Char(':')], 2).is_none());
        assert!(run(":üñ|", &[Trigger::Char(':')], 2).is_some());
    }

    #[test]
    fn trigger_inside_a_word_is_found() {
        let found = run("mail:sm|ile", &[Trigger::Char(':')], 1).unwrap();
        assert_eq!(found.query, "smile");
        assert_eq!(found.bounds, MatchBounds { start: 4, end: 10 });
    }
}
