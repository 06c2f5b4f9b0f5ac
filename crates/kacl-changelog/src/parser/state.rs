//! Line-by-line parser state

use kacl_core::types::ChangeType;
use tracing::trace;

use crate::changelog::Changelog;
use crate::types::{Entry, ReleaseSection, ReleaseTag};

/// Why a list item could not be placed in the open entry chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BadIndentation;

/// Accumulator threaded through the lines of one parse
///
/// Open entries are owned by the stack; an entry is attached to its parent
/// when it is closed, and the root entry is committed to the changelog on
/// flush.
#[derive(Debug, Default)]
pub(super) struct ParserState {
    pub changelog: Changelog,
    pub release: Option<(ReleaseTag, Option<String>)>,
    pub change_type: Option<ChangeType>,
    entry_stack: Vec<(Entry, usize)>,
}

impl ParserState {
    /// Start a release section, registering it even if it stays empty
    pub fn start_release(&mut self, tag: ReleaseTag, timestamp: Option<String>) {
        self.flush();
        self.changelog
            .releases
            .entry(tag.clone())
            .or_insert_with(|| ReleaseSection::new(timestamp.clone()));
        self.release = Some((tag, timestamp));
        self.change_type = None;
    }

    /// Start a change-type subsection within the current release
    pub fn start_change_type(&mut self, change_type: ChangeType) {
        self.flush();
        self.change_type = Some(change_type);
    }

    /// Whether an entry chain is open
    pub fn has_open_entry(&self) -> bool {
        !self.entry_stack.is_empty()
    }

    /// Indentation of the innermost open entry
    pub fn innermost_indentation(&self) -> Option<usize> {
        self.entry_stack.last().map(|(_, indentation)| *indentation)
    }

    /// Place a new list item according to its indentation
    ///
    /// Same indentation as the root starts a new top-level entry; deeper than
    /// the innermost entry makes a child of it; otherwise the item must line
    /// up with an enclosing entry and becomes its sibling.
    pub fn open_entry(&mut self, entry: Entry, indentation: usize) -> Result<(), BadIndentation> {
        let Some(&(_, root_indentation)) = self.entry_stack.first() else {
            self.entry_stack.push((entry, indentation));
            return Ok(());
        };

        if indentation == root_indentation {
            self.flush();
        } else if Some(indentation) <= self.innermost_indentation() {
            while self.entry_stack.len() > 1
                && Some(indentation) < self.innermost_indentation()
            {
                self.close_innermost();
            }
            if self.entry_stack.len() == 1 || Some(indentation) != self.innermost_indentation() {
                return Err(BadIndentation);
            }
            self.close_innermost();
        }

        self.entry_stack.push((entry, indentation));
        Ok(())
    }

    /// Extend the innermost open entry with a continuation line
    pub fn continue_entry(&mut self, text: &str) {
        if let Some((entry, _)) = self.entry_stack.last_mut() {
            entry.text.push(' ');
            entry.text.push_str(text);
        }
    }

    /// Commit the pending entry chain once release, change type and root entry are all set
    pub fn flush(&mut self) {
        let (Some(change_type), false) = (self.change_type, self.entry_stack.is_empty()) else {
            return;
        };
        let Some((tag, timestamp)) = self.release.clone() else {
            return;
        };
        while self.entry_stack.len() > 1 {
            self.close_innermost();
        }
        if let Some((root, _)) = self.entry_stack.pop() {
            trace!(%tag, %change_type, text = %root.text, "flushing entry");
            self.changelog
                .releases
                .entry(tag)
                .or_insert_with(|| ReleaseSection::new(timestamp))
                .push(change_type, root);
        }
    }

    /// Pop the innermost entry into its parent's children
    fn close_innermost(&mut self) {
        if self.entry_stack.len() < 2 {
            return;
        }
        if let Some((entry, _)) = self.entry_stack.pop() {
            if let Some((parent, _)) = self.entry_stack.last_mut() {
                parent.children.push(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_in_section() -> ParserState {
        let mut state = ParserState::default();
        state.start_release(ReleaseTag::from("1.0.0"), Some("2021-04-12".to_string()));
        state.start_change_type(ChangeType::Added);
        state
    }

    fn committed(state: &ParserState) -> &Vec<Entry> {
        &state.changelog.releases["1.0.0"].entries[&ChangeType::Added]
    }

    #[test]
    fn test_nested_entries_are_attached_on_flush() {
        let mut state = state_in_section();
        state.open_entry(Entry::new("parent"), 0).unwrap();
        state.open_entry(Entry::new("child"), 2).unwrap();
        state.open_entry(Entry::new("grandchild"), 4).unwrap();
        state.open_entry(Entry::new("second child"), 2).unwrap();
        state.flush();

        assert_eq!(
            committed(&state),
            &vec![Entry::new("parent").with_children(vec![
                Entry::new("child").with_children(vec![Entry::new("grandchild")]),
                Entry::new("second child"),
            ])]
        );
        assert!(!state.has_open_entry());
    }

    #[test]
    fn test_root_indentation_starts_new_entry() {
        let mut state = state_in_section();
        state.open_entry(Entry::new("one"), 0).unwrap();
        state.open_entry(Entry::new("nested"), 2).unwrap();
        state.open_entry(Entry::new("two"), 0).unwrap();
        state.flush();

        assert_eq!(committed(&state).len(), 2);
        assert_eq!(committed(&state)[1], Entry::new("two"));
    }

    #[test]
    fn test_unmatched_indentation() {
        let mut state = state_in_section();
        state.open_entry(Entry::new("one"), 0).unwrap();
        state.open_entry(Entry::new("nested"), 2).unwrap();
        assert_eq!(state.open_entry(Entry::new("odd"), 1), Err(BadIndentation));
    }

    #[test]
    fn test_shallower_than_root() {
        let mut state = state_in_section();
        state.open_entry(Entry::new("indented root"), 2).unwrap();
        state.open_entry(Entry::new("child"), 4).unwrap();
        assert_eq!(state.open_entry(Entry::new("outdented"), 0), Err(BadIndentation));
    }

    #[test]
    fn test_continuation_extends_innermost() {
        let mut state = state_in_section();
        state.open_entry(Entry::new("parent"), 0).unwrap();
        state.open_entry(Entry::new("child split"), 2).unwrap();
        state.continue_entry("over lines");
        state.flush();

        assert_eq!(
            committed(&state)[0].children[0].text,
            "child split over lines"
        );
    }

    #[test]
    fn test_flush_without_change_type_keeps_entries_open() {
        let mut state = ParserState::default();
        state.start_release(ReleaseTag::from("1.0.0"), None);
        state.open_entry(Entry::new("orphan"), 0).unwrap();
        state.flush();
        assert!(state.has_open_entry());
        assert!(state.changelog.releases["1.0.0"].is_empty());
    }
}
