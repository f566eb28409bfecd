use std::collections::BTreeSet;

use survey_spec::SelectionSettings;

/// What a press on an option did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected { index: usize },
    Deselected { index: usize },
    /// Out of range, deselect not allowed, or the maximum is already reached.
    Ignored,
}

/// Selection state of one selection question.
///
/// Single-select replaces the previous choice; multi-select adds options
/// until `max_multi_select` is reached and refuses further presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionHandler {
    max_multi_select: usize,
    allow_deselect: bool,
    option_count: usize,
    selected: BTreeSet<usize>,
}

impl SelectionHandler {
    pub fn new(
        max_multi_select: usize,
        allow_deselect: bool,
        default_selection: &[usize],
        option_count: usize,
    ) -> Self {
        let max_multi_select = max_multi_select.max(1);
        let selected = default_selection
            .iter()
            .copied()
            .filter(|index| *index < option_count)
            .take(max_multi_select)
            .collect();
        Self {
            max_multi_select,
            allow_deselect,
            option_count,
            selected,
        }
    }

    pub fn from_settings(settings: &SelectionSettings, option_count: usize) -> Self {
        Self::new(
            settings.mode.max_multi_select(),
            settings.allow_deselect,
            &settings.default_selection,
            option_count,
        )
    }

    pub fn is_multiple(&self) -> bool {
        self.max_multi_select > 1
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Whether the selection is exactly `indexes`, in any order.
    pub fn holds_exactly(&self, indexes: &[usize]) -> bool {
        indexes.iter().copied().collect::<BTreeSet<_>>() == self.selected
    }

    /// Selected option indexes in ascending order.
    pub fn selected_indexes(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn press(&mut self, index: usize) -> SelectionEvent {
        if index >= self.option_count {
            return SelectionEvent::Ignored;
        }

        if self.selected.contains(&index) {
            if !self.allow_deselect {
                return SelectionEvent::Ignored;
            }
            self.selected.remove(&index);
            return SelectionEvent::Deselected { index };
        }

        if !self.is_multiple() {
            self.selected.clear();
        } else if self.selected.len() >= self.max_multi_select {
            return SelectionEvent::Ignored;
        }
        self.selected.insert(index);
        SelectionEvent::Selected { index }
    }
}
