use parking_lot::{Mutex, MutexGuard};

/// A value behind its own lock.
///
/// Every sensor channel and every published command is one `Guarded` field.
/// Readers get a copy of a complete earlier write; nothing ever holds the lock
/// across a callback. When several fields are locked together, lock them in
/// declaration order (front, rear, left, right; steering before pedal).
#[derive(Debug, Default)]
pub struct Guarded<T> {
    value: Mutex<T>,
}

impl<T> Guarded<T> {
    pub fn new(value: T) -> Self {
        Self { value: Mutex::new(value) }
    }

    pub fn set(&self, value: T) {
        *self.value.lock() = value;
    }

    /// Lock for a multi-field snapshot or publish.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock()
    }
}

impl<T: Clone> Guarded<T> {
    pub fn get(&self) -> T {
        self.value.lock().clone()
    }
}
