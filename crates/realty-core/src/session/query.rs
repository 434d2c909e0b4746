//! User query types and the input submitter.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::RequestId;

/// A trimmed, non-empty locality query typed by the user.
///
/// Every constructor goes through [`Query::parse`], so a `Query` value always
/// satisfies the non-empty invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Trims `raw` and returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Query {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or("query must not be blank")
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receiver of submitted queries.
///
/// Implemented by the session controller; the submitter never touches session
/// state itself, it only signals the event.
pub trait QueryHandler {
    fn handle_query(&self, query: Query) -> RequestId;
}

/// Local input buffer that turns confirmed text into [`Query`] events.
#[derive(Debug, Default, Clone)]
pub struct QuerySubmitter {
    buffer: String,
}

impl QuerySubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the buffer with whatever the user typed.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Current, untrimmed buffer content.
    pub fn input(&self) -> &str {
        &self.buffer
    }

    /// Submits the buffer to `handler`.
    ///
    /// Whitespace-only input is a no-op and leaves the buffer untouched.
    /// Otherwise exactly one trimmed [`Query`] is handed over and the buffer is
    /// cleared.
    pub fn submit<H: QueryHandler + ?Sized>(&mut self, handler: &H) -> Option<RequestId> {
        let query = Query::parse(&self.buffer)?;
        let request_id = handler.handle_query(query);
        self.buffer.clear();
        Some(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingHandler {
        received: RefCell<Vec<Query>>,
    }

    impl QueryHandler for RecordingHandler {
        fn handle_query(&self, query: Query) -> RequestId {
            self.received.borrow_mut().push(query);
            RequestId::new()
        }
    }

    #[test]
    fn test_parse_trims_input() {
        let query = Query::parse("  Analyze Wakad \n").unwrap();
        assert_eq!(query.as_str(), "Analyze Wakad");
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse(" \t\n ").is_none());
    }

    #[test]
    fn test_blank_query_does_not_deserialize() {
        assert!(serde_json::from_str::<Query>("\"  \"").is_err());
        let query: Query = serde_json::from_str("\" Wakad \"").unwrap();
        assert_eq!(query.as_str(), "Wakad");
    }

    #[test]
    fn test_submit_emits_trimmed_query_and_clears_buffer() {
        let handler = RecordingHandler::default();
        let mut submitter = QuerySubmitter::new();
        submitter.set_input("   Wakad   ");

        let request_id = submitter.submit(&handler);

        assert!(request_id.is_some());
        assert_eq!(*handler.received.borrow(), vec![Query::parse("Wakad").unwrap()]);
        assert_eq!(submitter.input(), "");
    }

    #[test]
    fn test_submit_blank_is_noop() {
        let handler = RecordingHandler::default();
        let mut submitter = QuerySubmitter::new();
        submitter.set_input("    ");

        assert!(submitter.submit(&handler).is_none());
        assert!(handler.received.borrow().is_empty());
        assert_eq!(submitter.input(), "    ");
    }

    #[test]
    fn test_submit_twice_emits_once_per_confirmation() {
        let handler = RecordingHandler::default();
        let mut submitter = QuerySubmitter::new();
        submitter.set_input("Aundh");
        submitter.submit(&handler);
        // Buffer is empty now, so the second confirmation does nothing.
        submitter.submit(&handler);

        assert_eq!(handler.received.borrow().len(), 1);
    }
}
