use std::sync::Arc;
use std::time::Duration;

use crate::buffer::TextBuffer;
use crate::registry::{Candidate, Registry, RegistryError, Row, Searcher};
use crate::results::{MAX_RESULTS, POPOVER_WIDTH, Popover, ResultList};
use crate::session::{CancelToken, Dispatch, Session};
use crate::word::{self, MatchBounds};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Tunables applied with [`Autocompleter::apply_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteOptions {
    pub min_length: usize,
    pub timeout: Duration,
    pub max_results: usize,
    pub cancel_on_change: bool,
    pub dispatch: Dispatch,
    pub popover_width: u32,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            timeout: DEFAULT_TIMEOUT,
            max_results: MAX_RESULTS,
            cancel_on_change: false,
            dispatch: Dispatch::Inline,
            popover_width: POPOVER_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Searching,
    Visible,
}

/// A chosen entry, handed to selection callbacks.
///
/// The bounds track edits made through [`Selection::replace`], so the
/// trailing space lands after whatever the callback inserted.
pub struct Selection<'a, B: TextBuffer> {
    buffer: &'a mut B,
    bounds: MatchBounds,
    candidate: &'a dyn Candidate,
}

impl<B: TextBuffer> Selection<'_, B> {
    pub fn candidate(&self) -> &dyn Candidate {
        self.candidate
    }

    pub fn bounds(&self) -> MatchBounds {
        self.bounds
    }

    /// The matched text, trigger character included.
    pub fn matched_text(&self) -> String {
        self.buffer.text(self.bounds.range())
    }

    pub fn buffer(&mut self) -> &mut B {
        &mut *self.buffer
    }

    /// Replaces the matched text, trigger included, with `text`.
    pub fn replace(&mut self, text: &str) {
        self.buffer.delete(self.bounds.range());
        self.buffer.insert(self.bounds.start, text);
        self.bounds.end = self.bounds.start + text.chars().count();
    }
}

/// Called when the user picks an entry. Returning `true` closes the popover.
pub type SelectedFn<B> = Box<dyn FnMut(&mut Selection<'_, B>) -> bool>;

struct SearchDone {
    epoch: u64,
    results: Vec<Box<dyn Candidate>>,
}

/// Watches a text buffer and offers completions in a popover.
///
/// The host calls [`autocomplete`](Self::autocomplete) whenever the buffer
/// changes and forwards navigation keys to [`move_up`](Self::move_up),
/// [`move_down`](Self::move_down) and [`select`](Self::select).
pub struct Autocompleter<B: TextBuffer, P: Popover> {
    buffer: B,
    list: ResultList<P>,
    registry: Registry,
    on_selects: Vec<SelectedFn<B>>,

    parent: CancelToken,
    session: Option<Session>,
    epoch: u64,
    pending: bool,
    bounds: Option<MatchBounds>,
    state: State,
    results_tx: flume::Sender<SearchDone>,
    results_rx: flume::Receiver<SearchDone>,

    min_length: usize,
    timeout: Duration,
    cancel_on_change: bool,
    dispatch: Dispatch,
    paused: bool,
}

impl<B: TextBuffer, P: Popover> Autocompleter<B, P> {
    /// `parent` scopes every search; cancelling it cancels all of them.
    pub fn new(parent: CancelToken, buffer: B, popover: P) -> Self {
        let (results_tx, results_rx) = flume::unbounded();
        let defaults = AutocompleteOptions::default();
        Self {
            buffer,
            list: ResultList::new(popover),
            registry: Registry::new(),
            on_selects: Vec::with_capacity(1),
            parent,
            session: None,
            epoch: 0,
            pending: false,
            bounds: None,
            state: State::Idle,
            results_tx,
            results_rx,
            min_length: defaults.min_length,
            timeout: defaults.timeout,
            cancel_on_change: defaults.cancel_on_change,
            dispatch: defaults.dispatch,
            paused: false,
        }
    }

    pub fn apply_options(&mut self, options: &AutocompleteOptions) {
        self.set_min_length(options.min_length);
        self.set_timeout(options.timeout);
        self.set_max_results(options.max_results);
        self.set_cancel_on_change(options.cancel_on_change);
        self.set_dispatch(options.dispatch);
        self.set_popover_width(options.popover_width);
    }

    /// Minimum number of characters after the trigger before searching.
    pub fn set_min_length(&mut self, min_length: usize) {
        self.min_length = min_length;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_max_results(&mut self, max_results: usize) {
        self.list.set_max_results(max_results);
    }

    /// Whether each buffer change cancels the previous search. Off by
    /// default, so searches outlive the widgets they were started for.
    pub fn set_cancel_on_change(&mut self, cancel_on_change: bool) {
        self.cancel_on_change = cancel_on_change;
    }

    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    pub fn set_popover_width(&mut self, width: u32) {
        self.list.popover_mut().set_min_width(width);
    }

    pub fn add_selected_fn<F>(&mut self, selected_fn: F)
    where
        F: FnMut(&mut Selection<'_, B>) -> bool + 'static,
    {
        self.on_selects.push(Box::new(selected_fn));
    }

    /// Registers a searcher.
    ///
    /// # Panics
    ///
    /// Panics if another searcher already uses the same trigger.
    pub fn use_searcher(&mut self, searcher: Arc<dyn Searcher>) {
        if let Err(err) = self.try_use_searcher(searcher) {
            panic!("autocompleter: {err}");
        }
    }

    pub fn try_use_searcher(&mut self, searcher: Arc<dyn Searcher>) -> Result<(), RegistryError> {
        self.registry.register(searcher)
    }

    pub fn unuse_searcher(&mut self, searcher: &Arc<dyn Searcher>) -> bool {
        self.registry.unregister(searcher)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn popover(&self) -> &P {
        self.list.popover()
    }

    pub fn rows(&self) -> Vec<Row> {
        self.list.rows()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list.selected_index()
    }

    /// Bounds of the word the current results were searched for.
    pub fn bounds(&self) -> Option<MatchBounds> {
        self.bounds
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Hides the popover and ignores buffer changes until unpaused.
    pub fn pause(&mut self) {
        self.paused = true;
        self.clear();
    }

    /// Resumes reacting to buffer changes. Nothing is shown until the next
    /// call to [`autocomplete`](Self::autocomplete).
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_visible(&self) -> bool {
        self.list.is_visible()
    }

    /// Re-reads the word under the cursor and searches for it.
    pub fn autocomplete(&mut self) {
        self.cancel_session();
        self.list.clear();

        if self.paused {
            self.hide();
            return;
        }

        let Some(found) = word::extract(&self.buffer, &self.registry, self.min_length) else {
            self.hide();
            return;
        };

        let session = Session::start(
            self.epoch,
            &self.parent,
            self.cancel_on_change,
            self.timeout,
            found.bounds,
        );
        self.bounds = Some(found.bounds);
        log::debug!(
            "autocomplete: session {} searching {:?} via {} ({})",
            session.epoch,
            found.query,
            found.trigger,
            found.searcher.name()
        );

        match self.dispatch {
            Dispatch::Inline => {
                self.state = State::Searching;
                let results = found.searcher.search(&session.ctx, &found.query);
                let live = session.is_live();
                self.session = Some(session);
                if live {
                    self.finish(results);
                } else {
                    log::debug!("autocomplete: session {} ran out of time", self.epoch);
                    self.finish(Vec::new());
                }
            }
            Dispatch::Background => {
                let ctx = session.ctx.clone();
                let epoch = session.epoch;
                let tx = self.results_tx.clone();
                let searcher = found.searcher;
                let query = found.query;
                smol::unblock(move || {
                    let results = searcher.search(&ctx, &query);
                    let _ = tx.send(SearchDone { epoch, results });
                })
                .detach();

                self.session = Some(session);
                self.pending = true;
                self.state = State::Searching;
            }
        }
    }

    /// Applies background results that are ready. Returns whether the
    /// pending search finished, with or without results.
    pub fn poll(&mut self) -> bool {
        let mut finished = false;
        while let Ok(done) = self.results_rx.try_recv() {
            finished |= self.apply(done);
        }
        if !finished && self.pending && !self.session.as_ref().is_some_and(Session::is_live) {
            log::debug!("autocomplete: session {} expired while pending", self.epoch);
            self.pending = false;
            self.hide();
            finished = true;
        }
        finished
    }

    /// Waits until the pending background search finishes or times out.
    pub async fn settle(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        let Some(deadline) = self.session.as_ref().map(|session| session.ctx.deadline()) else {
            return false;
        };

        let rx = self.results_rx.clone();
        loop {
            let received = smol::future::or(async { rx.recv_async().await.ok() }, async {
                smol::Timer::at(deadline).await;
                None
            })
            .await;

            match received {
                Some(done) => {
                    if self.apply(done) {
                        return true;
                    }
                }
                None => return self.poll(),
            }
        }
    }

    fn apply(&mut self, done: SearchDone) -> bool {
        if !self.pending || done.epoch != self.epoch {
            log::debug!(
                "autocomplete: discarding results of superseded session {}",
                done.epoch
            );
            return false;
        }
        self.pending = false;

        if self.session.as_ref().is_some_and(Session::is_live) {
            self.finish(done.results);
        } else {
            self.finish(Vec::new());
        }
        true
    }

    fn finish(&mut self, results: Vec<Box<dyn Candidate>>) {
        if self.paused || results.is_empty() {
            self.hide();
            return;
        }

        self.list.populate(results);
        let anchor = self
            .bounds
            .map(|bounds| self.buffer.location(bounds.start))
            .unwrap_or_default();
        self.list.show(anchor);
        self.state = State::Visible;
    }

    /// Applies the highlighted entry. Returns `false` when nothing is shown.
    pub fn select(&mut self) -> bool {
        if self.list.is_empty() || !self.is_visible() {
            return false;
        }
        let selected = self.list.selected_index();
        self.select_row(selected);
        true
    }

    /// Applies the entry at `index`, as when a row is clicked.
    pub fn activate_row(&mut self, index: usize) -> bool {
        self.select_row(Some(index))
    }

    fn select_row(&mut self, index: Option<usize>) -> bool {
        let (Some(index), Some(bounds)) = (index, self.bounds) else {
            self.clear();
            return false;
        };
        let Some(candidate) = self.list.get(index) else {
            self.clear();
            return false;
        };

        let mut selection = Selection {
            buffer: &mut self.buffer,
            bounds,
            candidate,
        };
        let mut handled_end = None;
        for on_select in self.on_selects.iter_mut() {
            if on_select(&mut selection) {
                handled_end = Some(selection.bounds.end);
                break;
            }
        }

        let Some(end) = handled_end else {
            return false;
        };
        self.buffer.insert(end, " ");
        self.clear();
        true
    }

    pub fn move_up(&mut self) -> bool {
        self.list.move_selection(false)
    }

    pub fn move_down(&mut self) -> bool {
        self.list.move_selection(true)
    }

    /// Clears and hides the popover. Returns `false` if it was not showing.
    pub fn clear(&mut self) -> bool {
        self.cancel_session();
        if !self.is_visible() {
            if self.state == State::Searching {
                self.hide();
            }
            return false;
        }

        self.list.clear();
        self.hide();
        true
    }

    /// Host notification that the text widget went away.
    pub fn on_unmap(&mut self) {
        self.cancel_session();
        if self.state == State::Searching {
            self.state = State::Idle;
        }
    }

    fn hide(&mut self) {
        self.list.hide();
        self.state = State::Idle;
    }

    fn cancel_session(&mut self) {
        // Dropping the session cancels its token when it owns one.
        self.session = None;
        self.pending = false;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
