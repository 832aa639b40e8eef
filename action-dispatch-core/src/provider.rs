//! Context providers and the responder-chain abstraction
//!
//! Before an action is validated or performed, the manager walks a set of
//! collaborators and lets each one contribute key/value data into the
//! dispatch context. The shape of that walk generalizes a UI toolkit's
//! responder chain: a trigger may itself contribute, and chains of linked
//! responders are followed via [`Responder::next_responder`] collecting
//! every link that can provide context. Host adapters plug their own
//! notion of ambient UI context in through [`ChainSource`] without
//! touching dispatch logic.

use crate::context::ActionContext;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A collaborator able to contribute key/value data into a dispatch
/// context during the gather phase.
///
/// Implementations should only add keys, never remove them, and must be
/// safe to call more than once per dispatch. The manager deduplicates
/// providers by pointer identity, so the same provider object is invoked
/// at most once per gather pass.
pub trait ContextProvider: Send + Sync {
    fn provide(&self, context: &ActionContext);
}

/// One link in a responder chain.
pub trait Responder: Send + Sync {
    /// The next link, or `None` at the end of the chain.
    fn next_responder(&self) -> Option<Arc<dyn Responder>>;

    /// The provider this link contributes as, if any.
    fn context_provider(&self) -> Option<Arc<dyn ContextProvider>> {
        None
    }
}

/// Pluggable source of responder chains and extra providers.
///
/// The core asks the chain source for zero or more ordered chains related
/// to the current dispatch, plus any standalone providers to run after the
/// chain walk (a host adapter typically contributes its application
/// delegate here).
pub trait ChainSource: Send + Sync {
    /// Ordered responder chains to walk for this dispatch.
    fn responder_chains(&self, _context: &ActionContext) -> Vec<Arc<dyn Responder>> {
        Vec::new()
    }

    /// Standalone providers to run after the chain walk.
    fn providers(&self, _context: &ActionContext) -> Vec<Arc<dyn ContextProvider>> {
        Vec::new()
    }
}

/// A chain source that contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChainSource;

impl ChainSource for NoopChainSource {}

/// The object that triggered a dispatch.
///
/// Stored in the context info under [`ActionKey::SENDER`](crate::ActionKey::SENDER).
/// A responder sender roots a chain of its own during the gather phase; a
/// provider sender contributes directly, ahead of all chain providers.
#[derive(Clone, Default)]
pub enum Sender {
    #[default]
    None,
    /// An arbitrary object with no part in context gathering.
    Object(Arc<dyn Any + Send + Sync>),
    /// A sender that contributes context itself.
    Provider(Arc<dyn ContextProvider>),
    /// A sender that roots a responder chain.
    Responder(Arc<dyn Responder>),
}

impl Sender {
    /// Wrap an arbitrary object as a sender.
    pub fn object(value: impl Any + Send + Sync) -> Self {
        Sender::Object(Arc::new(value))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Sender::None)
    }
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::None => write!(f, "Sender::None"),
            Sender::Object(_) => write!(f, "Sender::Object(..)"),
            Sender::Provider(_) => write!(f, "Sender::Provider(..)"),
            Sender::Responder(_) => write!(f, "Sender::Responder(..)"),
        }
    }
}
