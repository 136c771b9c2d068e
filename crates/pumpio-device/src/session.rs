//! Device sessions: refcounted, lock-serialized access to an opened board.
//!
//! A session pairs one [`PollDriver`] with one mutex. Every poll and every
//! lifecycle transition runs under that mutex, so two threads polling the
//! same board serialize whole acquisitions instead of interleaving their
//! transfers (which would corrupt the select sequence on the pad board).
//! Handles are the unit of ownership: cloning a handle is a logical
//! re-open, dropping or closing one is a release, and the driver (and with
//! it the transport) goes away exactly once, when the last handle does.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use piuio_protocol::{self as piuio, InputBatch};
use piubtn_protocol as piubtn;
use tracing::{debug, info, warn};

use crate::cycle::PollDriver;
use crate::error::{DeviceError, DeviceResult};

struct SessionState {
    driver: Option<Box<dyn PollDriver>>,
    gone: bool,
    refs: usize,
}

/// One opened board, shared by any number of logical owners.
///
/// The `gone` flag only ever goes one way. A disconnect notification sets
/// it under the session lock, so it never tears an in-flight acquisition;
/// polls fail with [`DeviceError::Gone`] afterwards, while releases keep
/// working so owners can still unwind cleanly.
pub struct DeviceSession {
    name: String,
    state: Mutex<SessionState>,
}

impl DeviceSession {
    /// Open a session over a freshly opened driver. The returned handle is
    /// the first logical owner.
    pub fn open(name: impl Into<String>, driver: Box<dyn PollDriver>) -> SessionHandle {
        let name = name.into();
        info!("Opened session for {name}");
        let session = Arc::new(Self {
            name,
            state: Mutex::new(SessionState {
                driver: Some(driver),
                gone: false,
                refs: 1,
            }),
        });
        SessionHandle {
            session,
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True while the device is believed attached.
    pub fn is_live(&self) -> bool {
        !self.lock_state().gone
    }

    /// Number of open handles.
    pub fn handle_count(&self) -> usize {
        self.lock_state().refs
    }

    /// Disconnect notification. Marks the session gone; resources stay
    /// allocated until the last handle closes.
    pub fn mark_gone(&self) {
        let mut state = self.lock_state();
        if !state.gone {
            state.gone = true;
            warn!("Device {} disconnected, session marked gone", self.name);
        }
    }

    /// One multiplexed acquisition, serialized against every other caller
    /// of this session.
    pub fn poll_batch(&self, output: &piuio::OutputPacket) -> DeviceResult<InputBatch> {
        let mut state = self.lock_state();
        if state.gone {
            return Err(DeviceError::gone(&self.name));
        }
        let driver = state
            .driver
            .as_mut()
            .ok_or_else(|| DeviceError::gone(&self.name))?;
        driver.poll_batch(output)
    }

    /// One button board poll, serialized against every other caller of
    /// this session.
    pub fn poll_buttons(&self, output: &piubtn::OutputPacket) -> DeviceResult<piubtn::InputPacket> {
        let mut state = self.lock_state();
        if state.gone {
            return Err(DeviceError::gone(&self.name));
        }
        let driver = state
            .driver
            .as_mut()
            .ok_or_else(|| DeviceError::gone(&self.name))?;
        driver.poll_buttons(output)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Another owner for a session that still has its driver. `None` once
    /// the device is gone or the last handle already released it.
    fn try_acquire(self: &Arc<Self>) -> Option<SessionHandle> {
        let mut state = self.lock_state();
        if state.gone || state.driver.is_none() {
            return None;
        }
        state.refs += 1;
        debug!("Session {} acquired, {} handles", self.name, state.refs);
        Some(SessionHandle {
            session: Arc::clone(self),
            closed: false,
        })
    }

    fn release(&self) {
        let mut state = self.lock_state();
        state.refs = state.refs.saturating_sub(1);
        if state.refs == 0 && state.driver.take().is_some() {
            debug!("Session {} released its driver", self.name);
        }
    }
}

/// Owning handle to a [`DeviceSession`].
///
/// Cloning is a logical re-open of the same device; dropping, or the
/// explicit [`close`](SessionHandle::close), releases one owner. The last
/// release drops the driver and its transport.
pub struct SessionHandle {
    session: Arc<DeviceSession>,
    closed: bool,
}

impl SessionHandle {
    /// The shared session, e.g. for handing to a disconnect watcher.
    pub fn session(&self) -> &Arc<DeviceSession> {
        &self.session
    }

    /// Release this owner now instead of at drop.
    pub fn close(mut self) {
        self.closed = true;
        self.session.release();
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session", &self.session.name)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Clone for SessionHandle {
    fn clone(&self) -> Self {
        // A live handle keeps refs >= 1, so the driver is still there and
        // this cannot race the last release.
        let mut state = self.session.lock_state();
        state.refs += 1;
        debug!("Session {} acquired, {} handles", self.session.name, state.refs);
        drop(state);
        Self {
            session: Arc::clone(&self.session),
            closed: false,
        }
    }
}

impl Deref for SessionHandle {
    type Target = DeviceSession;

    fn deref(&self) -> &DeviceSession {
        &self.session
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if !self.closed {
            self.session.release();
        }
    }
}

/// Process-wide table of open sessions, keyed by device identifier.
///
/// [`open_shared`](SessionRegistry::open_shared) hands out another handle
/// to a healthy existing session and otherwise opens a fresh one through
/// the supplied opener. [`disconnect`](SessionRegistry::disconnect) marks
/// the session gone and forgets it, so the next open goes back to the
/// hardware and fails with [`DeviceError::NotFound`] if the board really
/// is unplugged.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<DeviceSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// A handle to the named device, sharing the existing session when one
    /// is still healthy.
    pub fn open_shared<F>(&self, id: &str, open_driver: F) -> DeviceResult<SessionHandle>
    where
        F: FnOnce() -> DeviceResult<Box<dyn PollDriver>>,
    {
        let mut sessions = self.lock_sessions();
        if let Some(session) = sessions.get(id) {
            if let Some(handle) = session.try_acquire() {
                debug!("Sharing existing session for {id}");
                return Ok(handle);
            }
            // All handles closed, or the device went away. Forget the
            // stale entry and open fresh.
            sessions.remove(id);
        }
        let handle = DeviceSession::open(id, open_driver()?);
        sessions.insert(id.to_owned(), Arc::clone(handle.session()));
        Ok(handle)
    }

    /// Disconnect notification for the named device.
    pub fn disconnect(&self, id: &str) {
        if let Some(session) = self.lock_sessions().remove(id) {
            session.mark_gone();
        }
    }

    /// True if a session is registered under `id`, healthy or not.
    pub fn contains(&self, id: &str) -> bool {
        self.lock_sessions().contains_key(id)
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, Arc<DeviceSession>>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
