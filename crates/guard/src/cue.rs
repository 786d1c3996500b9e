/// Sink for the cosmetic feedback a decision triggers (the UI plays a chime
/// on success and an error tone on a role mismatch).
///
/// Cosmetic only: no access decision may depend on what a cue does.
pub trait AccessCue: Send + Sync {
    fn allowed(&self) {}
    fn denied(&self) {}
}

/// The no-feedback sink (headless composition, tests, muted UI).
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl AccessCue for SilentCue {}
