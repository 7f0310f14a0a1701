//! Render fault boundary.
//!
//! Column accessors and renderers are caller code; if one of them panics
//! while a page is being drawn, the table does not try to recover on its own.
//! Wrap the top-level render in a [`FaultBoundary`] instead: it catches the
//! panic, remembers it, and shows a recovery state until the caller retries
//! or asks for a full reload.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{error, info};

/// A panic caught while rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Render fault: {message}")]
pub struct RenderFault {
    /// Panic message extracted from the panic payload.
    pub message: String,
}

/// Result of rendering through a boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryOutcome<T> {
    /// The render completed.
    Rendered(T),
    /// The render panicked now or earlier; show a recovery affordance.
    Faulted(RenderFault),
}

impl<T> BoundaryOutcome<T> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<T, RenderFault> {
        match self {
            Self::Rendered(value) => Ok(value),
            Self::Faulted(fault) => Err(fault),
        }
    }
}

/// Catches render-time panics and holds the faulted state.
#[derive(Default)]
pub struct FaultBoundary {
    fault: Option<RenderFault>,
    on_reload: Option<Box<dyn FnMut()>>,
}

impl FaultBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full-reload callback, the last-resort recovery.
    pub fn with_reload<F>(mut self, on_reload: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_reload = Some(Box::new(on_reload));
        self
    }

    /// Run `render` unless the boundary is already faulted.
    ///
    /// Once faulted, the closure is not called again until [`retry`] or
    /// [`reload`] clears the fault.
    ///
    /// [`retry`]: FaultBoundary::retry
    /// [`reload`]: FaultBoundary::reload
    pub fn render<T, F>(&mut self, render: F) -> BoundaryOutcome<T>
    where
        F: FnOnce() -> T,
    {
        if let Some(fault) = &self.fault {
            return BoundaryOutcome::Faulted(fault.clone());
        }

        match catch_unwind(AssertUnwindSafe(render)) {
            Ok(value) => BoundaryOutcome::Rendered(value),
            Err(panic) => {
                let fault = RenderFault {
                    message: extract_panic_message(&*panic),
                };
                error!("{}", fault);
                self.fault = Some(fault.clone());
                BoundaryOutcome::Faulted(fault)
            }
        }
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// The fault currently held, if any.
    pub fn fault(&self) -> Option<&RenderFault> {
        self.fault.as_ref()
    }

    /// Clear the fault so the next render runs again.
    pub fn retry(&mut self) {
        if self.fault.take().is_some() {
            info!("Retrying render after fault");
        }
    }

    /// Clear the fault and invoke the full-reload callback.
    ///
    /// Returns true if a reload callback was registered.
    pub fn reload(&mut self) -> bool {
        self.fault = None;
        match self.on_reload.as_mut() {
            Some(reload) => {
                info!("Full reload requested");
                reload();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for FaultBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultBoundary")
            .field("fault", &self.fault)
            .field("has_reload", &self.on_reload.is_some())
            .finish()
    }
}

/// Extract a human-readable message from a panic payload.
///
/// Panics carry either `&str` or `String` payloads; anything else gets a
/// generic message.
fn extract_panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
