//! Action registry and dispatcher
//!
//! The manager owns the identifier-to-action mapping and orchestrates a
//! dispatch: parse the trigger, resolve an action, gather context from the
//! provider chain, then validate or perform with lifecycle notifications
//! around the execution. All failure and absence conditions degrade to
//! logged no-ops or sentinel values; `perform` and `validate` never panic
//! or return errors to their UI-facing call sites.

use crate::action::{Action, Completion, Validation};
use crate::context::ActionContext;
use crate::identifier::ParsedIdentifier;
use crate::info::ActionInfo;
use crate::key::ActionKey;
use crate::notification::{
    ActionNotification, NotificationStage, NotificationToken,
};
use crate::provider::{ChainSource, ContextProvider, NoopChainSource, Responder, Sender};
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registers and triggers actions.
///
/// Actions are distinguished by a text identifier and registered as
/// instances, so a generic action type can be instantiated several times
/// with different settings and registered under different identifiers.
/// Actions should be regarded as immutable once registered; state for a
/// specific invocation lives in the accompanying [`ActionContext`].
///
/// The manager is a cheap clone over shared state, so it can be handed to
/// UI callbacks and stored inside contexts freely.
///
/// # Example
/// ```
/// use action_dispatch_core::prelude::*;
/// use std::sync::Arc;
///
/// struct SaveAction;
///
/// impl Action for SaveAction {
///     fn perform(&self, context: &ActionContext) {
///         let _format = context.string(&ActionKey::new("format"));
///         // write the document out
///     }
/// }
///
/// let manager = ActionManager::new();
/// manager.register(vec![Arc::new(SaveAction)]);
/// manager.perform("menu.file.Save(\"format\": \"pdf\")");
/// ```
#[derive(Clone)]
pub struct ActionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    actions: RwLock<HashMap<String, Arc<dyn Action>>>,
    notifications: RwLock<Vec<(NotificationToken, ActionNotification)>>,
    next_token: AtomicU64,
    chain_source: Box<dyn ChainSource>,
}

impl ActionManager {
    /// Create a manager with no responder chains of its own.
    pub fn new() -> Self {
        Self::with_chain_source(NoopChainSource)
    }

    /// Create a manager that discovers context providers through the
    /// given chain source.
    pub fn with_chain_source(chain_source: impl ChainSource + 'static) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                actions: RwLock::new(HashMap::new()),
                notifications: RwLock::new(Vec::new()),
                next_token: AtomicU64::new(0),
                chain_source: Box::new(chain_source),
            }),
        }
    }

    /// Register a bunch of actions, keyed by their identifiers.
    ///
    /// Typically called early on, during application startup. Registering
    /// a different action under an existing identifier overwrites the old
    /// one with a warning.
    pub fn register(&self, actions: Vec<Arc<dyn Action>>) {
        let mut registry = self.inner.actions.write();
        for action in actions {
            let identifier = action.identifier().into_owned();
            if registry.insert(identifier.clone(), action).is_some() {
                warn!(action = %identifier, "replacing previously registered action");
            }
        }
    }

    /// Register a global notification listener.
    ///
    /// Global listeners survive across dispatches and fire at every
    /// lifecycle stage of every matching action. The returned token can
    /// be passed to [`ActionManager::unregister_notification`].
    pub fn register_notification(
        &self,
        action: impl Into<String>,
        callback: impl Fn(&NotificationStage, &ActionContext) + Send + Sync + 'static,
    ) -> NotificationToken {
        let token = NotificationToken::new(self.inner.next_token.fetch_add(1, Ordering::Relaxed));
        self.inner
            .notifications
            .write()
            .push((token, ActionNotification::new(action, callback)));
        token
    }

    /// Remove a global notification listener.
    ///
    /// Returns `false` if the token was already removed or never issued.
    pub fn unregister_notification(&self, token: NotificationToken) -> bool {
        let mut notifications = self.inner.notifications.write();
        let before = notifications.len();
        notifications.retain(|(existing, _)| *existing != token);
        notifications.len() != before
    }

    /// Resolve a trigger identifier against the registry.
    ///
    /// Path components are popped from the front one at a time and each
    /// single token is tested against the registry; the first match wins
    /// and the remaining components become the context's parameters.
    /// Inline arguments are merged into the info as individual keys.
    /// Returns `None` if no component matches a registered action.
    pub fn resolve(&self, identifier: &str, info: ActionInfo) -> Option<ActionContext> {
        let parsed = ParsedIdentifier::parse(identifier);

        let (index, action) = {
            let registry = self.inner.actions.read();
            parsed.components.iter().enumerate().find_map(|(index, component)| {
                registry
                    .get(component.as_str())
                    .map(|action| (index, Arc::clone(action)))
            })?
        };

        let parameters: Vec<String> = parsed.components[index + 1..].to_vec();
        let mut info = info;
        for (key, value) in parsed.arguments {
            info.set(ActionKey::new(key), Value::from(value));
        }
        if !parameters.is_empty() {
            info.set(
                ActionKey::COMPONENTS,
                Value::List(parameters.iter().map(|c| Value::from(c.as_str())).collect()),
            );
        }

        Some(ActionContext::new(
            self.clone(),
            action,
            identifier,
            parameters,
            info,
        ))
    }

    /// Gather context for a dispatch.
    ///
    /// Every discovered provider is given the mutable context to
    /// contribute into, in discovery order. Providers should only add
    /// keys; contributions are expected to be commutative.
    pub fn gather(&self, context: &ActionContext) {
        for provider in self.providers(context) {
            provider.provide(context);
        }
    }

    /// Perform the action for an identifier.
    ///
    /// If no registered action matches, logs and returns. Otherwise fires
    /// `willPerform`, invokes the action's completion-taking perform, and
    /// fires `didPerform` (or `didFail` with the action's error) once the
    /// completion is called.
    pub fn perform(&self, identifier: &str) {
        self.perform_with_info(identifier, ActionInfo::new());
    }

    /// Perform with a caller-supplied info, e.g. one pre-seeded with a
    /// sender.
    pub fn perform_with_info(&self, identifier: &str, info: ActionInfo) {
        let Some(context) = self.resolve(identifier, info) else {
            info!(identifier, "no registered action");
            return;
        };
        let context = Arc::new(context);
        self.gather(&context);

        debug!(action = %context.action().identifier(), "performing action");
        context.notify(&NotificationStage::WillPerform, &self.global_notifications());

        let manager = self.clone();
        let completion_context = Arc::clone(&context);
        let completed: Completion = Box::new(move |result| {
            let stage = match result {
                Ok(()) => NotificationStage::DidPerform,
                Err(error) => NotificationStage::DidFail(error),
            };
            completion_context.notify(&stage, &manager.global_notifications());
        });

        let action = Arc::clone(context.action());
        action.perform_with_completion(&context, completed);
    }

    /// Validate the action for an identifier.
    ///
    /// Follows the same path as performing, building the context first,
    /// but calls the action's `validate` instead. An unresolved
    /// identifier yields the ineligible sentinel rather than an error. A
    /// truthy `skipValidation` flag in the context short-circuits to a
    /// fully active validation, an escape hatch for trusted callers.
    pub fn validate(&self, identifier: &str) -> Validation {
        self.validate_with_info(identifier, ActionInfo::new())
    }

    /// Validate with a caller-supplied info.
    pub fn validate_with_info(&self, identifier: &str, info: ActionInfo) -> Validation {
        let Some(context) = self.resolve(identifier, info) else {
            debug!(identifier, "validating unregistered identifier");
            return Validation::unresolved(identifier);
        };
        self.gather(&context);

        debug!(action = %context.action().identifier(), "validating action");
        if context.flag(&ActionKey::SKIP_VALIDATION) {
            return Validation::new(context.action().identifier().into_owned());
        }
        context.action().validate(&context)
    }

    /// Build a parallel list of UI affordances from a list of action
    /// identifiers.
    ///
    /// Each identifier is validated with a copy of the supplied info and
    /// handed to the builder; results are collected in input order.
    pub fn build_items<T>(
        &self,
        identifiers: &[&str],
        info: &ActionInfo,
        mut builder: impl FnMut(&str, Validation) -> T,
    ) -> Vec<T> {
        identifiers
            .iter()
            .map(|identifier| {
                let validation = self.validate_with_info(identifier, info.clone());
                builder(identifier, validation)
            })
            .collect()
    }

    /// The responder chains to search for context providers.
    ///
    /// A responder sender roots the first chain; the manager's chain
    /// source supplies the rest.
    fn responder_chains(&self, context: &ActionContext) -> Vec<Arc<dyn Responder>> {
        let mut chains = Vec::new();
        if let Sender::Responder(responder) = context.sender() {
            chains.push(responder);
        }
        chains.extend(self.inner.chain_source.responder_chains(context));
        chains
    }

    /// The providers consulted during the gather phase, in order:
    /// the sender itself when it is a provider, then every providing link
    /// of each responder chain, then the chain source's standalone
    /// providers. Duplicates are skipped by pointer identity.
    fn providers(&self, context: &ActionContext) -> Vec<Arc<dyn ContextProvider>> {
        let mut providers: Vec<Arc<dyn ContextProvider>> = Vec::new();

        if let Sender::Provider(provider) = context.sender() {
            push_unique(&mut providers, provider);
        }

        for chain in self.responder_chains(context) {
            let mut link = Some(chain);
            while let Some(responder) = link {
                if let Some(provider) = responder.context_provider() {
                    push_unique(&mut providers, provider);
                }
                link = responder.next_responder();
            }
        }

        for provider in self.inner.chain_source.providers(context) {
            push_unique(&mut providers, provider);
        }

        providers
    }

    fn global_notifications(&self) -> Vec<ActionNotification> {
        self.inner
            .notifications
            .read()
            .iter()
            .map(|(_, notification)| notification.clone())
            .collect()
    }
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(
    providers: &mut Vec<Arc<dyn ContextProvider>>,
    provider: Arc<dyn ContextProvider>,
) {
    let pointer = Arc::as_ptr(&provider) as *const ();
    let duplicate = providers
        .iter()
        .any(|existing| std::ptr::eq(Arc::as_ptr(existing) as *const (), pointer));
    if !duplicate {
        providers.push(provider);
    }
}
