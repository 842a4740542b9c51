//! Observer interface between the layout core and whatever renders it.
//!
//! Animators receive an observer at construction and push two kinds of
//! notification into it:
//!
//! - [`LayoutObserver::on_geometry_changed`] when the aggregate bounding box
//!   of the animated collection changed, so the owner must re-layout
//! - [`LayoutObserver::on_repaint_needed`] for every other visible change
//!
//! Observers are shared through `Rc`, which keeps every animator `!Send`:
//! mutation from another thread is rejected by the compiler.

use std::cell::Cell;
use std::rc::Rc;

/// Receiver of layout/animation notifications
pub trait LayoutObserver {
    /// The bounding box of the observed content changed
    fn on_geometry_changed(&self);

    /// Something visible changed inside an unchanged bounding box
    fn on_repaint_needed(&self);
}

/// Shared observer handle
pub type SharedObserver = Rc<dyn LayoutObserver>;

/// Observer that ignores every notification
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl LayoutObserver for NoopObserver {
    fn on_geometry_changed(&self) {}
    fn on_repaint_needed(&self) {}
}

/// Create a shared no-op observer
pub fn noop_observer() -> SharedObserver {
    Rc::new(NoopObserver)
}

/// Observer built from two closures
pub struct FnObserver<G, R>
where
    G: Fn(),
    R: Fn(),
{
    geometry: G,
    repaint: R,
}

impl<G: Fn(), R: Fn()> FnObserver<G, R> {
    pub fn new(geometry: G, repaint: R) -> Self {
        Self { geometry, repaint }
    }
}

impl<G: Fn(), R: Fn()> LayoutObserver for FnObserver<G, R> {
    fn on_geometry_changed(&self) {
        (self.geometry)()
    }

    fn on_repaint_needed(&self) {
        (self.repaint)()
    }
}

/// Observer that counts notifications
///
/// Useful for tests and for renderers that batch invalidations per frame.
#[derive(Debug, Default)]
pub struct CountingObserver {
    geometry: Cell<usize>,
    repaint: Cell<usize>,
}

impl CountingObserver {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn geometry_changes(&self) -> usize {
        self.geometry.get()
    }

    pub fn repaints(&self) -> usize {
        self.repaint.get()
    }

    /// Reset both counters, returning `(geometry, repaint)` before the reset
    pub fn take(&self) -> (usize, usize) {
        (self.geometry.replace(0), self.repaint.replace(0))
    }
}

impl LayoutObserver for CountingObserver {
    fn on_geometry_changed(&self) {
        self.geometry.set(self.geometry.get() + 1);
    }

    fn on_repaint_needed(&self) {
        self.repaint.set(self.repaint.get() + 1);
    }
}
