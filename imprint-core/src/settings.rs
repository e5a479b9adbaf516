use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

/// Tunable decision parameters shared by both resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Maximum Hamming distance at which two perceptual hashes are treated as
    /// the same work. Raising it trades false negatives for false positives.
    pub similarity_threshold: u32,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl RegistrySettings {
    pub fn with_threshold(similarity_threshold: u32) -> Self {
        Self {
            similarity_threshold,
        }
    }
}
