use serde::{Deserialize, Serialize};

/// Byte range into the originating source file.
///
/// Nodes synthesized by the optimizer copy the span of the stage node they
/// were derived from, so diagnostics for rewritten code keep pointing at
/// positions in the original source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Shift both endpoints forward by `delta` bytes.
    ///
    /// Used when a function's source is re-parsed standalone and its
    /// positions have to be mapped back into the enclosing file.
    pub const fn shift(self, delta: usize) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

pub type Spanned<T> = (T, Span);
