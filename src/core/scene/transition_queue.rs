//=========================================================================
// Transition Queue
//=========================================================================
//
// Transition requests raised outside the host's direct control.
//
// Two sources feed the scene manager between frames:
// - `TransitionQueue`: scenes push requests from their hooks through
//   `SceneContext::transitions` (button clicks, timers, key presses).
// - `TransitionHandle`: cloneable cross-thread requester backed by a
//   bounded crossbeam channel (loader threads, external timers).
//
// The scene manager drains both at frame boundaries and feeds each
// request through `transition_to`, so the re-entrancy policy applies.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::SceneKey;

//=== Transition Request ==================================================

/// Request to make `target` the current scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest<S: SceneKey> {
    pub target: S,
}

impl<S: SceneKey> TransitionRequest<S> {
    pub fn new(target: S) -> Self {
        Self { target }
    }
}

//=== Transition Queue ====================================================

/// Queue for transition requests raised by scene hooks.
///
/// Scenes queue transitions here during updates. The scene manager
/// processes this queue at frame boundaries.
pub struct TransitionQueue<S: SceneKey> {
    queue: Vec<TransitionRequest<S>>,
}

impl<S: SceneKey> TransitionQueue<S> {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition to be processed at the next frame boundary.
    pub fn push(&mut self, target: S) {
        self.queue.push(TransitionRequest::new(target));
    }

    /// Returns an iterator over the queued requests.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRequest<S>> {
        self.queue.iter()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued requests.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Clears all queued requests.
    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all requests from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<TransitionRequest<S>> {
        std::mem::take(&mut self.queue)
    }
}

impl<S: SceneKey> Default for TransitionQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Transition Handle ===================================================

/// Cloneable, thread-safe requester for scene transitions.
///
/// Obtained from [`SceneManager::handle`](super::SceneManager::handle).
/// Requests are applied on the frame thread at the next frame boundary.
///
/// ```rust
/// # use ballot_engine::prelude::*;
/// # let manager: SceneManager<&'static str> =
/// #     SceneManager::new(Box::new(HeadlessRenderer::new()), Camera::new());
/// let handle = manager.handle();
/// std::thread::spawn(move || {
///     // e.g. after a background asset load finishes
///     handle.request("votingBooth");
/// })
/// .join()
/// .unwrap();
/// ```
#[derive(Clone)]
pub struct TransitionHandle<S: SceneKey> {
    sender: Sender<TransitionRequest<S>>,
}

impl<S: SceneKey> TransitionHandle<S> {
    pub(crate) fn new(sender: Sender<TransitionRequest<S>>) -> Self {
        Self { sender }
    }

    /// Requests a transition to `target`.
    ///
    /// Never blocks. Returns `false` if the request was dropped because the
    /// channel is full or the manager is gone.
    pub fn request(&self, target: S) -> bool {
        match self.sender.try_send(TransitionRequest::new(target)) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                warn!("Transition channel full, dropping request for {:?}", request.target);
                false
            }
            Err(TrySendError::Disconnected(request)) => {
                warn!("Scene manager gone, dropping request for {:?}", request.target);
                false
            }
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
