//! Telemetry sessions.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use skytraq_frame::{Frame, MessageId};
use skytraq_transport::Transport;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::link::Link;
use crate::payload::{NavigationSolution, SoftwareVersion};

/// Cooperative stop signal shared between a session and whoever ends it.
///
/// The session checks it after every decoded frame, so a receiver that has
/// gone silent delays the stop by up to one transport read timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the session to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type Callback<'a, T> = Box<dyn FnMut(T) + 'a>;
type FrameCallback<'a> = Box<dyn FnMut(&Frame) + 'a>;

/// Callbacks invoked by [`Link::run`], one per message kind.
///
/// A frame with no typed callback goes to the [`Handlers::on_frame`]
/// catch-all, or is skipped if there is none. Callbacks run on the session
/// thread and block it while they run.
#[derive(Default)]
pub struct Handlers<'a> {
    software_version: Option<Callback<'a, SoftwareVersion>>,
    navigation: Option<Callback<'a, NavigationSolution>>,
    frame: Option<FrameCallback<'a>>,
}

impl<'a> Handlers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for each software version response.
    #[must_use]
    pub fn on_software_version(mut self, f: impl FnMut(SoftwareVersion) + 'a) -> Self {
        self.software_version = Some(Box::new(f));
        self
    }

    /// Called for each navigation data message.
    #[must_use]
    pub fn on_navigation(mut self, f: impl FnMut(NavigationSolution) + 'a) -> Self {
        self.navigation = Some(Box::new(f));
        self
    }

    /// Called for every frame without a typed callback above.
    #[must_use]
    pub fn on_frame(mut self, f: impl FnMut(&Frame) + 'a) -> Self {
        self.frame = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Handlers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("software_version", &self.software_version.is_some())
            .field("navigation", &self.navigation.is_some())
            .field("frame", &self.frame.is_some())
            .finish()
    }
}

impl<T: Transport> Link<T> {
    /// Decode frames and dispatch them until `cancel` is set.
    ///
    /// Returns `Ok(())` once cancelled. Any read error (including a corrupted
    /// frame) or a payload that does not fit its typed structure ends the
    /// session with that error; calling `run` again resumes reading at the
    /// next frame.
    pub fn run(&mut self, handlers: &mut Handlers<'_>, cancel: &CancelToken) -> Result<()> {
        info!("telemetry session started");
        while !cancel.is_cancelled() {
            let frame = self.read_frame()?;
            trace!(id = %frame.id, len = frame.payload.len(), "received frame");
            dispatch(handlers, &frame)?;
        }
        info!("telemetry session cancelled");
        Ok(())
    }
}

fn dispatch(handlers: &mut Handlers<'_>, frame: &Frame) -> Result<()> {
    match frame.id {
        MessageId::SOFTWARE_VERSION if handlers.software_version.is_some() => {
            let version = SoftwareVersion::try_from(frame)?;
            if let Some(f) = handlers.software_version.as_mut() {
                f(version);
            }
        }
        MessageId::NAV_DATA if handlers.navigation.is_some() => {
            let nav = NavigationSolution::try_from(frame)?;
            if let Some(f) = handlers.navigation.as_mut() {
                f(nav);
            }
        }
        _ => match handlers.frame.as_mut() {
            Some(f) => f(frame),
            None => debug!(
                id = %frame.id,
                name = frame.id.name(),
                "no handler for message"
            ),
        },
    }
    Ok(())
}
