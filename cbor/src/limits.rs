/// Resource bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    // Deepest container nesting `Reader::skip` will walk
    pub max_depth: usize, // default 32

    // Largest byte or text string payload that will be allocated
    pub max_length: usize, // default 16 MiB
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_length: 16 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// No caps at all; only suitable for trusted input.
    pub fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
            max_length: usize::MAX,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub(crate) fn check_length(&self, length: u64) -> Result<usize, crate::Error> {
        match usize::try_from(length) {
            Ok(l) if l <= self.max_length => Ok(l),
            _ => Err(crate::Error::AllocationLimit(length, self.max_length)),
        }
    }
}
