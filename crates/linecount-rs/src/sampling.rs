use crate::{ConfigurationError, Result};
use std::num::NonZeroU32;

/// Chooses which frames are fed to the counter when processing every Nth frame.
///
/// Frame numbers are 1-based: with `every_n = 3` frames 3, 6, 9, ... are processed.
/// Skipping frames only thins the observations; tracks can step over a line between samples without being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    every_n: NonZeroU32,
}

impl Default for FrameSampler {
    fn default() -> Self {
        FrameSampler {
            every_n: NonZeroU32::MIN,
        }
    }
}

impl FrameSampler {
    pub fn new(every_n: NonZeroU32) -> FrameSampler {
        FrameSampler { every_n }
    }

    /// Returns a sampler from an untrusted skip factor
    pub fn try_from_factor(every_n: u32) -> Result<FrameSampler> {
        NonZeroU32::new(every_n)
            .map(FrameSampler::new)
            .ok_or(ConfigurationError::InvalidFrameSkip)
    }

    pub fn every_n(&self) -> u32 {
        self.every_n.get()
    }

    /// Returns true if the 1-based `frame_number` should be processed
    pub fn should_process(&self, frame_number: u64) -> bool {
        frame_number % u64::from(self.every_n.get()) == 0
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn every_frame_by_default() {
        let sampler = FrameSampler::default();
        assert!((1..=10).all(|frame_number| sampler.should_process(frame_number)));
    }

    #[test]
    fn every_third_frame() -> Result<()> {
        let sampler = FrameSampler::try_from_factor(3)?;
        let processed = (1..=10)
            .filter(|frame_number| sampler.should_process(*frame_number))
            .collect::<Vec<u64>>();
        assert_eq!(processed, vec![3, 6, 9]);
        Ok(())
    }

    #[test]
    fn zero_factor_is_rejected() {
        assert_eq!(
            FrameSampler::try_from_factor(0),
            Err(ConfigurationError::InvalidFrameSkip)
        );
    }
}
