//! Trigger-driven autocompletion for chat composers.
//!
//! Searchers register against a trigger character (or plain words), the
//! [`Autocompleter`] extracts the word under the cursor whenever the buffer
//! changes and shows what the matching searcher returns in a popover.

mod buffer;
mod controller;
mod registry;
mod results;
mod session;
mod word;

pub use buffer::{Anchor, StringBuffer, TextBuffer};
pub use controller::{
    AutocompleteOptions, Autocompleter, DEFAULT_MIN_LENGTH, DEFAULT_TIMEOUT, SelectedFn, Selection,
    State,
};
pub use registry::{AsAny, Candidate, Registry, RegistryError, Row, Searcher, Trigger};
pub use results::{
    ListFocus, ListPopover, MAX_RESULTS, POPOVER_WIDTH, Popover, ResultList, wrap_index,
};
pub use session::{CancelToken, Dispatch, SearchContext};
pub use word::{Extraction, MatchBounds, extract};
