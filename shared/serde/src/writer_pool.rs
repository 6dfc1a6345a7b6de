use std::sync::Mutex;

use crate::ByteWriter;

/// Reusable pool of [`ByteWriter`]s. Thread-safe: a writer is handed to one
/// caller at a time and comes back through `recycle`.
pub struct WriterPool {
    free: Mutex<Vec<ByteWriter>>,
    max_pooled: usize,
}

impl WriterPool {
    pub fn new(max_pooled: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_pooled,
        }
    }

    /// Takes a cleared writer from the pool, or a new one if none are free
    pub fn checkout(&self) -> ByteWriter {
        let pooled = match self.free.lock() {
            Ok(mut free) => free.pop(),
            Err(poisoned) => poisoned.into_inner().pop(),
        };
        pooled.unwrap_or_default()
    }

    /// Returns a writer to the pool. The writer is reset before it can be handed out again.
    pub fn recycle(&self, mut writer: ByteWriter) {
        writer.reset();
        let mut free = match self.free.lock() {
            Ok(free) => free,
            Err(poisoned) => poisoned.into_inner(),
        };
        if free.len() < self.max_pooled {
            free.push(writer);
        }
    }

    pub fn pooled(&self) -> usize {
        match self.free.lock() {
            Ok(free) => free.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Default for WriterPool {
    fn default() -> Self {
        Self::new(32)
    }
}
