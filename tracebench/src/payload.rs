//! Precomputed log payload memory.

/// Default buffer size, the largest log size the original controller ever
/// schedules.
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// A cyclic-alphabet byte buffer that per-span log payloads are sliced
/// from.
///
/// The buffer is filled with `'A'..='Z'` repeating, sized up front so a
/// payload slice is a single borrow with no wraparound logic. It is built
/// once per driver and shared read-only by every iteration of a batch.
#[derive(Clone, Debug)]
pub struct LogPayload {
    buf: String,
}

impl Default for LogPayload {
    fn default() -> Self {
        LogPayload::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LogPayload {
    /// Builds a buffer of `len` cyclic-alphabet bytes.
    pub fn with_capacity(len: usize) -> Self {
        let mut payload = LogPayload {
            buf: String::with_capacity(len),
        };
        payload.fill_to(len);
        payload
    }

    /// Grows the buffer so at least `len` bytes can be sliced. Existing
    /// content keeps its position in the cycle.
    pub fn grow_to(&mut self, len: usize) {
        self.fill_to(len);
    }

    fn fill_to(&mut self, len: usize) {
        while self.buf.len() < len {
            let i = self.buf.len();
            self.buf.push(char::from(b'A' + (i % 26) as u8));
        }
    }

    /// The first `len` payload bytes. `len` is clamped to the buffer size;
    /// callers grow the buffer first when a descriptor demands more than
    /// [`DEFAULT_CAPACITY`].
    pub fn slice(&self, len: usize) -> &str {
        &self.buf[..len.min(self.buf.len())]
    }

    /// Current buffer size in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
