//! History removal keys.

use crate::models::Message;

/// Selects a message to remove from the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryKey {
    /// Position in the history, oldest first
    Index(usize),
    /// Server-assigned message id
    Id(String),
}

impl From<usize> for HistoryKey {
    fn from(index: usize) -> Self {
        HistoryKey::Index(index)
    }
}

impl From<&str> for HistoryKey {
    fn from(id: &str) -> Self {
        HistoryKey::Id(id.to_string())
    }
}

impl From<String> for HistoryKey {
    fn from(id: String) -> Self {
        HistoryKey::Id(id)
    }
}

/// Remove the message selected by `key`, if there is one.
pub(crate) fn remove(history: &mut Vec<Message>, key: &HistoryKey) -> Option<Message> {
    let index = match key {
        HistoryKey::Index(index) => Some(*index).filter(|i| *i < history.len()),
        HistoryKey::Id(id) => history.iter().position(|m| &m.id == id),
    }?;
    Some(history.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn sample() -> Vec<Message> {
        let mut history = vec![
            Message::new(Role::User, "a"),
            Message::new(Role::Assistant, "b"),
            Message::new(Role::User, "c"),
            Message::new(Role::Assistant, "d"),
        ];
        history[1].id = "m1".to_string();
        history[3].id = "m1".to_string();
        history
    }

    fn texts(history: &[Message]) -> Vec<&str> {
        history.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn test_remove_by_index() {
        let mut history = sample();
        let removed = remove(&mut history, &HistoryKey::Index(2)).unwrap();
        assert_eq!(removed.text, "c");
        assert_eq!(texts(&history), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_remove_index_out_of_range() {
        let mut history = sample();
        assert!(remove(&mut history, &HistoryKey::Index(4)).is_none());
        assert_eq!(history.len(), 4);

        let mut empty = Vec::new();
        assert!(remove(&mut empty, &0usize.into()).is_none());
    }

    #[test]
    fn test_remove_by_id_takes_first_match() {
        let mut history = sample();
        let removed = remove(&mut history, &"m1".into()).unwrap();
        assert_eq!(removed.text, "b");
        assert_eq!(texts(&history), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut history = sample();
        assert!(remove(&mut history, &HistoryKey::from("nope".to_string())).is_none());
        assert_eq!(history.len(), 4);
    }
}
