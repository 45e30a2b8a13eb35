use crate::models::CriterionField;

/// The record in focus for preview, tracked by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The pointer moved over a visible record
    Hovered(String),
    CriterionChanged(CriterionField),
    Deleted(String),
    Reloaded,
}

impl Selection {
    pub fn transition(self, event: SelectionEvent) -> Selection {
        match (self, event) {
            (_, SelectionEvent::Hovered(id)) => Selection::Selected(id),
            (current, SelectionEvent::CriterionChanged(field)) if !field.affects_membership() => {
                current
            }
            (_, SelectionEvent::CriterionChanged(_)) => Selection::Unselected,
            (Selection::Selected(current), SelectionEvent::Deleted(id)) if current == id => {
                Selection::Unselected
            }
            (current, SelectionEvent::Deleted(_)) => current,
            (_, SelectionEvent::Reloaded) => Selection::Unselected,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(id: &str) -> Selection {
        Selection::Selected(id.to_string())
    }

    #[test]
    fn hover_selects_and_is_idempotent() {
        let state = Selection::Unselected.transition(SelectionEvent::Hovered("1".into()));
        assert_eq!(state, selected("1"));
        assert_eq!(state.transition(SelectionEvent::Hovered("1".into())), selected("1"));
    }

    #[test]
    fn sort_change_keeps_selection() {
        let state = selected("1").transition(SelectionEvent::CriterionChanged(CriterionField::SortBy));
        assert_eq!(state, selected("1"));
    }

    #[test]
    fn other_criteria_clear_selection() {
        for field in [
            CriterionField::SearchInput,
            CriterionField::ConnectionId,
            CriterionField::Tag,
            CriterionField::CreatedBy,
        ] {
            let state = selected("1").transition(SelectionEvent::CriterionChanged(field));
            assert_eq!(state, Selection::Unselected, "{field:?} should clear");
        }
    }

    #[test]
    fn only_deleting_the_selected_record_clears() {
        assert_eq!(
            selected("1").transition(SelectionEvent::Deleted("2".into())),
            selected("1")
        );
        assert_eq!(
            selected("1").transition(SelectionEvent::Deleted("1".into())),
            Selection::Unselected
        );
        assert_eq!(
            Selection::Unselected.transition(SelectionEvent::Deleted("1".into())),
            Selection::Unselected
        );
    }

    #[test]
    fn reload_clears() {
        assert_eq!(selected("1").transition(SelectionEvent::Reloaded), Selection::Unselected);
    }
}
