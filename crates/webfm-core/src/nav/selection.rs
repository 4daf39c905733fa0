//! Multi-select state scoped to the current listing.

use std::collections::BTreeSet;

use crate::event::{Event, Observers};
use crate::fs::path::RemotePath;

/// What the batch toolbar should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolbarState {
    pub selected: usize,
    /// `true` only when the listing is non-empty and fully selected.
    pub all_selected: bool,
    /// Whether delete/copy/move are available.
    pub batch_enabled: bool,
    /// `"<n> selected"`, or `None` with nothing selected.
    pub label: Option<String>,
}

/// Owns the set of selected paths.
///
/// The set only ever contains paths of the current scope (the listing
/// most recently applied through [`SelectionModel::rescope`]). Every
/// mutation emits [`Event::SelectionChanged`].
#[derive(Debug)]
pub struct SelectionModel {
    scope: Vec<RemotePath>,
    selected: BTreeSet<RemotePath>,
    observers: Observers,
}

impl SelectionModel {
    pub fn new(observers: Observers) -> Self {
        Self {
            scope: Vec::new(),
            selected: BTreeSet::new(),
            observers,
        }
    }

    /// Replaces the scope with the paths of a fresh listing and clears the
    /// selection.
    pub fn rescope(&mut self, paths: Vec<RemotePath>) {
        self.scope = paths;
        self.selected.clear();
        self.changed();
    }

    /// Adds `path` if absent, removes it if present.
    ///
    /// Paths outside the current listing are ignored.
    pub fn toggle(&mut self, path: &RemotePath) {
        if !self.scope.contains(path) {
            tracing::warn!(path = %path, "ignoring toggle of unlisted path");
            return;
        }
        if !self.selected.remove(path) {
            self.selected.insert(path.clone());
        }
        self.changed();
    }

    /// Selects every path in `paths`, unless all of them are already
    /// selected, in which case the selection is cleared instead.
    pub fn select_all(&mut self, paths: &[RemotePath]) {
        let listed: Vec<&RemotePath> = paths.iter().filter(|p| self.scope.contains(p)).collect();
        let all_already = !listed.is_empty() && listed.iter().all(|p| self.selected.contains(*p));
        if all_already {
            self.selected.clear();
        } else {
            self.selected.extend(listed.into_iter().cloned());
        }
        self.changed();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.changed();
    }

    pub fn is_selected(&self, path: &RemotePath) -> bool {
        self.selected.contains(path)
    }

    pub fn size(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected paths in listing order.
    pub fn all(&self) -> Vec<RemotePath> {
        self.scope
            .iter()
            .filter(|p| self.selected.contains(*p))
            .cloned()
            .collect()
    }

    /// Paths of the current listing.
    pub fn scope(&self) -> &[RemotePath] {
        &self.scope
    }

    pub fn toolbar(&self) -> ToolbarState {
        let selected = self.selected.len();
        ToolbarState {
            selected,
            all_selected: !self.scope.is_empty() && selected == self.scope.len(),
            batch_enabled: selected > 0,
            label: (selected > 0).then(|| format!("{selected} selected")),
        }
    }

    fn changed(&self) {
        self.observers.emit(Event::SelectionChanged(self.toolbar()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, FakeService};

    fn p(s: &str) -> RemotePath {
        RemotePath::parse(s).unwrap()
    }

    fn scoped(paths: &[&str]) -> (SelectionModel, crate::testing::Harness) {
        let h = harness(FakeService::new());
        let mut model = SelectionModel::new(h.observers.clone());
        model.rescope(paths.iter().map(|s| p(s)).collect());
        (model, h)
    }

    #[test]
    fn toggle_twice_is_noop() {
        let (mut model, _h) = scoped(&["a.txt", "b.txt"]);
        model.toggle(&p("a.txt"));
        assert!(model.is_selected(&p("a.txt")));
        model.toggle(&p("a.txt"));
        assert!(!model.is_selected(&p("a.txt")));
        assert_eq!(model.size(), 0);
    }

    #[test]
    fn select_all_cycles_all_none_all() {
        let (mut model, _h) = scoped(&["a", "b", "c"]);
        let listed = model.scope().to_vec();

        model.select_all(&listed);
        assert_eq!(model.size(), 3);
        model.select_all(&listed);
        assert_eq!(model.size(), 0);
        model.select_all(&listed);
        assert_eq!(model.size(), 3);
    }

    #[test]
    fn select_all_with_partial_selection_selects_rest() {
        let (mut model, _h) = scoped(&["a", "b"]);
        model.toggle(&p("a"));
        let listed = model.scope().to_vec();
        model.select_all(&listed);
        assert_eq!(model.size(), 2);
    }

    #[test]
    fn toggle_outside_scope_is_ignored() {
        let (mut model, h) = scoped(&["a"]);
        let before = h.view.events().len();
        model.toggle(&p("elsewhere"));
        assert_eq!(model.size(), 0);
        assert_eq!(h.view.events().len(), before);
    }

    #[test]
    fn rescope_clears_selection() {
        let (mut model, _h) = scoped(&["a", "b"]);
        model.toggle(&p("a"));
        model.rescope(vec![p("x")]);
        assert_eq!(model.size(), 0);
        assert_eq!(model.scope(), &[p("x")]);
    }

    #[test]
    fn all_returns_listing_order() {
        let (mut model, _h) = scoped(&["z", "a", "m"]);
        model.toggle(&p("m"));
        model.toggle(&p("z"));
        assert_eq!(model.all(), vec![p("z"), p("m")]);
    }

    #[test]
    fn toolbar_reflects_selection() {
        let (mut model, h) = scoped(&["a", "b"]);
        assert_eq!(model.toolbar(), ToolbarState::default());

        model.toggle(&p("a"));
        let last = h.view.events().pop();
        let Some(Event::SelectionChanged(state)) = last else {
            panic!("expected selection event");
        };
        assert_eq!(state.selected, 1);
        assert!(!state.all_selected);
        assert!(state.batch_enabled);
        assert_eq!(state.label.as_deref(), Some("1 selected"));

        model.toggle(&p("b"));
        assert!(model.toolbar().all_selected);
    }

    #[test]
    fn empty_listing_is_never_all_selected() {
        let (mut model, _h) = scoped(&[]);
        model.select_all(&[]);
        assert!(!model.toolbar().all_selected);
        assert!(!model.toolbar().batch_enabled);
    }

    #[test]
    fn every_mutation_emits_event() {
        let (mut model, h) = scoped(&["a"]);
        let start = h.view.events().len();
        model.toggle(&p("a"));
        model.clear();
        model.select_all(&[p("a")]);
        assert_eq!(h.view.events().len(), start + 3);
    }
}
