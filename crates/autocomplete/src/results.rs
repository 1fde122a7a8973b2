use crate::buffer::Anchor;
use crate::registry::{Candidate, Row};

/// Maximum number of rows shown for one search.
pub const MAX_RESULTS: usize = 8;
/// Default minimum width of the popover, in pixels.
pub const POPOVER_WIDTH: u32 = 250;

/// The popover and list widget capability provided by the host.
///
/// Row indices are positions in the list, in append order.
pub trait Popover {
    /// Whatever the host uses to remember which widget owns keyboard focus.
    type Focus;

    /// Shows the popover pointing at `anchor`, above the text.
    fn popup(&mut self, anchor: Anchor);
    fn popdown(&mut self);
    fn is_visible(&self) -> bool;
    fn set_min_width(&mut self, width: u32);

    fn append(&mut self, row: Row);
    fn remove(&mut self, index: usize);
    fn select(&mut self, index: usize);
    fn selected(&self) -> Option<usize>;

    fn focus_owner(&self) -> Option<Self::Focus>;
    /// Gives focus to a row so the list scrolls it into view.
    fn focus_row(&mut self, index: usize);
    fn restore_focus(&mut self, owner: Self::Focus);
}

/// Next selection index, wrapping at both ends of a list of `len` rows.
pub fn wrap_index(current: Option<usize>, len: usize, down: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match current {
        None => 0,
        Some(i) if down => (i + 1) % len,
        Some(0) => len - 1,
        Some(i) => (i - 1).min(len - 1),
    };
    Some(next)
}

/// Rendered results plus the popover they live in.
pub struct ResultList<P: Popover> {
    popover: P,
    entries: Vec<Box<dyn Candidate>>,
    max_results: usize,
    popped_up: bool,
}

impl<P: Popover> ResultList<P> {
    pub fn new(mut popover: P) -> Self {
        popover.set_min_width(POPOVER_WIDTH);
        popover.popdown();
        Self {
            popover,
            entries: Vec::with_capacity(MAX_RESULTS),
            max_results: MAX_RESULTS,
            popped_up: false,
        }
    }

    pub fn popover(&self) -> &P {
        &self.popover
    }

    pub fn popover_mut(&mut self) -> &mut P {
        &mut self.popover
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn set_max_results(&mut self, max_results: usize) {
        self.max_results = max_results.max(1);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Candidate> {
        self.entries.get(index).map(|entry| entry.as_ref())
    }

    /// Rows currently rendered, in list order.
    pub fn rows(&self) -> Vec<Row> {
        self.entries.iter().map(|entry| entry.render()).collect()
    }

    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty() && self.popover.is_visible()
    }

    /// Replaces the rendered rows and highlights the first one.
    ///
    /// Results past `max_results` are dropped. Returns the number of rows.
    pub fn populate(&mut self, results: Vec<Box<dyn Candidate>>) -> usize {
        self.clear();
        for candidate in results.into_iter().take(self.max_results) {
            self.popover.append(candidate.render());
            self.entries.push(candidate);
        }
        if !self.entries.is_empty() {
            self.popover.select(0);
        }
        self.entries.len()
    }

    /// Removes every row. Visibility is left to the caller.
    pub fn clear(&mut self) {
        for index in (0..self.entries.len()).rev() {
            self.popover.remove(index);
        }
        self.entries.clear();
    }

    pub fn show(&mut self, anchor: Anchor) {
        if !self.popped_up {
            self.popped_up = true;
            self.popover.popup(anchor);
        }
    }

    pub fn hide(&mut self) {
        if self.popped_up {
            self.popover.popdown();
            self.popped_up = false;
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.popover
            .selected()
            .filter(|index| *index < self.entries.len())
    }

    /// Moves the highlight one row, wrapping around. Keyboard focus stays
    /// wherever it was before the move.
    pub fn move_selection(&mut self, down: bool) -> bool {
        let current = self.selected_index();
        let Some(next) = wrap_index(current, self.entries.len(), down) else {
            return false;
        };

        self.popover.select(next);
        if current.is_none() {
            return true;
        }

        let owner = self.popover.focus_owner();
        self.popover.focus_row(next);
        if let Some(owner) = owner {
            self.popover.restore_focus(owner);
        }
        true
    }
}

/// Who holds keyboard focus in a [`ListPopover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFocus {
    Input,
    Row(usize),
}

/// A headless popover that records what it was asked to display.
#[derive(Debug, Clone)]
pub struct ListPopover {
    pub rows: Vec<Row>,
    pub selected: Option<usize>,
    pub visible: bool,
    pub anchor: Option<Anchor>,
    pub min_width: u32,
    pub focus: ListFocus,
    /// Every row that was scrolled into view through focus, in order.
    pub scrolled_to: Vec<usize>,
}

impl Default for ListPopover {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: None,
            visible: false,
            anchor: None,
            min_width: 0,
            focus: ListFocus::Input,
            scrolled_to: Vec::new(),
        }
    }
}

impl ListPopover {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Popover for ListPopover {
    type Focus = ListFocus;

    fn popup(&mut self, anchor: Anchor) {
        self.visible = true;
        self.anchor = Some(anchor);
    }

    fn popdown(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_min_width(&mut self, width: u32) {
        self.min_width = width;
    }

    fn append(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn remove(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
        match self.selected {
            Some(selected) if selected == index => self.selected = None,
            Some(selected) if selected > index => self.selected = Some(selected - 1),
            _ => {}
        }
    }

    fn select(&mut self, index: usize) {
        if index < self.rows.len() {
            self.selected = Some(index);
        }
    }

    fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn focus_owner(&self) -> Option<ListFocus> {
        Some(self.focus)
    }

    fn focus_row(&mut self, index: usize) {
        self.focus = ListFocus::Row(index);
        self.scrolled_to.push(index);
    }

    fn restore_focus(&mut self, owner: ListFocus) {
        self.focus = owner;
    }
}
