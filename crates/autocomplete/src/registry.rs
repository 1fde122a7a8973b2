use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::session::SearchContext;

/// Identifies which searcher a word is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Matches every plain word rather than a literal prefix character.
    WordBoundary,
    Char(char),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordBoundary => f.write_str("<word>"),
            Self::Char(ch) => write!(f, "{:?}", ch),
        }
    }
}

/// A rendered list entry. Hosts map it onto their own row widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub detail: Option<String>,
}

impl Row {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[doc(hidden)]
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One result produced by a [`Searcher`].
pub trait Candidate: AsAny + Send {
    fn render(&self) -> Row;
}

impl<'a> dyn Candidate + 'a {
    /// Recovers the searcher's concrete type inside a selection callback.
    pub fn downcast_ref<T: Candidate>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Anything that can look up entities for a partially typed word, such as
/// room members for `@`.
pub trait Searcher: Send + Sync {
    fn trigger(&self) -> Trigger;

    /// Name used in logs and registration errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Searches for `query`, which never includes the trigger character.
    ///
    /// Implementations doing I/O should watch [`SearchContext::is_cancelled`]
    /// and give up once it flips; anything returned after that is dropped.
    fn search(&self, ctx: &SearchContext, query: &str) -> Vec<Box<dyn Candidate>>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate trigger {trigger} for searcher {searcher}")]
    DuplicateTrigger { trigger: Trigger, searcher: String },
}

/// Searchers keyed by their trigger.
#[derive(Default)]
pub struct Registry {
    searchers: HashMap<Trigger, Arc<dyn Searcher>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, searcher: Arc<dyn Searcher>) -> Result<(), RegistryError> {
        let trigger = searcher.trigger();
        if self.searchers.contains_key(&trigger) {
            return Err(RegistryError::DuplicateTrigger {
                trigger,
                searcher: searcher.name().to_string(),
            });
        }
        self.searchers.insert(trigger, searcher);
        Ok(())
    }

    /// Removes `searcher` only if it is the instance stored for its trigger.
    pub fn unregister(&mut self, searcher: &Arc<dyn Searcher>) -> bool {
        let trigger = searcher.trigger();
        match self.searchers.get(&trigger) {
            Some(stored) if Arc::ptr_eq(stored, searcher) => {
                self.searchers.remove(&trigger);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, trigger: Trigger) -> Option<&Arc<dyn Searcher>> {
        self.searchers.get(&trigger)
    }

    /// Looks up a literal character, never the word-boundary searcher.
    pub fn get_char(&self, ch: char) -> Option<&Arc<dyn Searcher>> {
        self.searchers.get(&Trigger::Char(ch))
    }

    pub fn contains(&self, trigger: Trigger) -> bool {
        self.searchers.contains_key(&trigger)
    }

    pub fn len(&self) -> usize {
        self.searchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searchers.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct Fixed {
        pub trigger: Trigger,
        pub items: Vec<&'static str>,
    }

    #[derive(Debug)]
    pub(crate) struct Item(pub String);

    impl Candidate for Item {
        fn render(&self) -> Row {
            Row::new(self.0.clone())
        }
    }

    impl Searcher for Fixed {
        fn trigger(&self) -> Trigger {
            self.trigger
        }

        fn search(&self, _ctx: &SearchContext, query: &str) -> Vec<Box<dyn Candidate>> {
            self.items
                .iter()
                .filter(|item| item.starts_with(query))
                .map(|item| Box::new(Item(item.to_string())) as Box<dyn Candidate>)
                .collect()
        }
    }

    fn fixed(trigger: Trigger) -> Arc<dyn Searcher> {
        Arc::new(Fixed {
            trigger,
            items: vec![],
        })
    }

    #[test]
    fn duplicate_trigger_is_rejected() {
        let mut registry = Registry::new();
        registry.register(fixed(Trigger::Char('@'))).unwrap();
        registry.register(fixed(Trigger::WordBoundary)).unwrap();

        let err = registry.register(fixed(Trigger::Char('@'))).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateTrigger {
                trigger: Trigger::Char('@'),
                ..
            }
        ));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregister_requires_the_stored_instance() {
        let mut registry = Registry::new();
        let stored = fixed(Trigger::Char(':'));
        let impostor = fixed(Trigger::Char(':'));
        registry.register(stored.clone()).unwrap();

        assert!(!registry.unregister(&impostor));
        assert!(registry.contains(Trigger::Char(':')));

        assert!(registry.unregister(&stored));
        assert!(registry.is_empty());
        assert!(!registry.unregister(&stored));
    }

    #[test]
    fn char_lookup_skips_word_boundary() {
        let mut registry = Registry::new();
        registry.register(fixed(Trigger::WordBoundary)).unwrap();
        assert!(registry.get_char(' ').is_none());
        assert!(registry.get(Trigger::WordBoundary).is_some());
    }

    #[test]
    fn candidates_downcast_to_their_type() {
        let candidate: Box<dyn Candidate> = Box::new(Item("alice".into()));
        assert_eq!(candidate.downcast_ref::<Item>().unwrap().0, "alice");
        assert_eq!(candidate.render(), Row::new("alice"));
    }
}
