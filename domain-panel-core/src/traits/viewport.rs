//! Viewport probe abstract Trait

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Reports the current viewport width in pixels.
pub trait ViewportProbe: Send + Sync {
    fn width(&self) -> u32;
}

/// Viewport whose width is set by the host (or a test).
#[derive(Debug, Clone)]
pub struct SharedViewport {
    width: Arc<AtomicU32>,
}

impl SharedViewport {
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width: Arc::new(AtomicU32::new(width)),
        }
    }

    pub fn set_width(&self, width: u32) {
        self.width.store(width, Ordering::Relaxed);
    }
}

impl ViewportProbe for SharedViewport {
    fn width(&self) -> u32 {
        self.width.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_width() {
        let viewport = SharedViewport::new(1280);
        let handle = viewport.clone();
        handle.set_width(600);
        assert_eq!(viewport.width(), 600);
    }
}
