//! Flush guards
//!
//! - [`ControlGuard`] keeps the control that triggered a save disabled while the
//!   flush runs and re-enables it on every exit path, including early returns
//!   and errors.
//! - [`FlightGuard`] admits one flush at a time per store.

use std::sync::atomic::{AtomicBool, Ordering};

/// A UI control (e.g. the "Create" button) that triggers a save
pub trait SaveControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// Disables a control for its lifetime
pub struct ControlGuard<'a> {
    control: Option<&'a dyn SaveControl>,
}

impl<'a> ControlGuard<'a> {
    pub fn disable(control: Option<&'a dyn SaveControl>) -> Self {
        if let Some(control) = control {
            control.set_enabled(false);
        }
        Self { control }
    }
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        if let Some(control) = self.control {
            control.set_enabled(true);
        }
    }
}

/// Holds the in-flight flag until dropped
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    /// `None` when another holder already has the flag
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
