use std::time::Duration;

use super::format::AudioFormat;

/// A threshold-sized span of accumulated audio, ready for recognition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(Vec<u8>);

impl Utterance {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-participant audio accumulator
///
/// Bytes are appended until the buffer holds at least `threshold` bytes, at which
/// point the whole contents are handed out as one [`Utterance`] and the buffer
/// starts over empty. The threshold is a floor: the final frame is never split, so
/// an utterance may overshoot it. Silence and speech are treated alike.
#[derive(Debug)]
pub struct UtteranceBuffer {
    buffer: Vec<u8>,
    threshold: usize,
}

impl UtteranceBuffer {
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            buffer: Vec::with_capacity(threshold),
            threshold,
        }
    }

    /// Buffer sized for `duration` of audio in `format`
    pub fn for_duration(format: AudioFormat, duration: Duration) -> Self {
        Self::new(format.bytes_for(duration))
    }

    /// Append a frame, yielding the accumulated utterance once the threshold is reached
    pub fn append(&mut self, bytes: &[u8]) -> Option<Utterance> {
        self.buffer.extend_from_slice(bytes);

        if self.buffer.len() < self.threshold {
            return None;
        }

        let utterance = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.threshold));
        Some(Utterance(utterance))
    }

    /// Bytes currently waiting for the threshold
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
