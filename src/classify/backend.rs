use anyhow::Result;

use crate::Sample;

/// Classifier backend trait.
///
/// Implementations score a single RGB frame against their label set and
/// return one prediction per known class. Backends must not retain the
/// pixel slice beyond the `classify` call, and a returned `Sample` must
/// never be empty.
pub trait ClassifierBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// The label set this backend scores against.
    fn labels(&self) -> &[String];

    /// Classify one frame. The output is not required to be sorted.
    fn classify(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Sample>;

    /// Optional warm-up hook (e.g., a throwaway inference pass).
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
