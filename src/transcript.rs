//! Typed-output sink.

/// Receiver for committed letters.
pub trait CommitSink: Send {
    /// Append one accepted letter to the output.
    fn append(&mut self, label: &str);
}

/// In-memory typed output for the current session.
///
/// Holds everything the user has "typed" so far. Session-scoped and never
/// persisted; stopping the camera discards it along with detector state.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    text: String,
    commits: u64,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of letters committed so far.
    pub fn len(&self) -> u64 {
        self.commits
    }

    pub fn is_empty(&self) -> bool {
        self.commits == 0
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.commits = 0;
    }
}

impl CommitSink for TranscriptBuffer {
    fn append(&mut self, label: &str) {
        self.text.push_str(label);
        self.commits += 1;
    }
}
