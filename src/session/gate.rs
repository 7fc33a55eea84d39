/// Allows at most one synthesis/playback at a time
///
/// Non-blocking: a caller that fails to acquire drops its request.
#[derive(Debug, Default)]
pub struct SynthesisGate {
    busy: bool,
}

impl SynthesisGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the gate busy if it is free
    pub fn try_acquire(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    /// Free the gate. Must follow every successful `try_acquire`.
    pub fn release(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_busy() {
        let mut gate = SynthesisGate::new();
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        assert!(gate.is_busy());
    }

    #[test]
    fn test_release_reopens_gate() {
        let mut gate = SynthesisGate::new();
        assert!(gate.try_acquire());
        gate.release();
        assert!(!gate.is_busy());
        assert!(gate.try_acquire());
    }
}
