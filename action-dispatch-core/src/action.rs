//! The action contract: validate and perform
//!
//! Actions are registered with a manager under a string identifier and
//! looked up when a trigger fires. They are stateless with respect to any
//! single dispatch; per-dispatch state lives in the context, which lets
//! one action instance serve many dispatches.

use crate::context::ActionContext;
use crate::identifier::derived_identifier;
use crate::info::ActionInfo;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// Error reported by an action through its completion callback.
///
/// Surfaced only through the `DidFail` notification stage; the dispatcher
/// never inspects or rethrows it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Completion callback for asynchronous-capable actions.
///
/// Must be invoked exactly once on every exit path; the `didPerform` /
/// `didFail` notifications only fire from this callback, so a completion
/// that is never called silently suspends them forever.
pub type Completion = Box<dyn FnOnce(Result<(), ActionError>) + Send>;

/// Three-valued UI state computed by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    /// Should not appear at all.
    Ineligible,
    /// Visible but disabled.
    Inactive,
    /// Visible and enabled.
    Active,
}

/// The computed UI-facing state for one action at one moment.
///
/// `identifier` is always populated, including for the "not found"
/// sentinel produced by [`Validation::unresolved`]. The name fields
/// default to deterministic templated strings derived from the
/// identifier, intended as localization lookup keys;
/// `localization_info` carries substitution values for those lookups
/// (a count for a pluralized title, say).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub identifier: String,
    pub state: ValidationState,
    pub full_name: String,
    pub short_name: String,
    pub icon_name: String,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub localization_info: serde_json::Map<String, serde_json::Value>,
}

impl Validation {
    /// A fully active validation with default names.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self::with_state(identifier, ValidationState::Active)
    }

    /// A validation in the given state with default names.
    pub fn with_state(identifier: impl Into<String>, state: ValidationState) -> Self {
        let identifier = identifier.into();
        Self {
            full_name: Self::default_full_name(&identifier),
            short_name: Self::default_short_name(&identifier),
            icon_name: Self::default_icon_name(&identifier),
            identifier,
            state,
            localization_info: serde_json::Map::new(),
        }
    }

    /// Sentinel for an identifier that resolved to no registered action.
    pub fn unresolved(identifier: impl Into<String>) -> Self {
        Self::with_state(identifier, ValidationState::Ineligible)
    }

    pub fn default_full_name(identifier: &str) -> String {
        format!("action.{identifier}.title")
    }

    pub fn default_short_name(identifier: &str) -> String {
        format!("action.{identifier}.short")
    }

    pub fn default_icon_name(identifier: &str) -> String {
        format!("action.{identifier}.icon")
    }

    /// Whether the action should be enabled.
    pub fn enabled(&self) -> bool {
        self.state == ValidationState::Active
    }

    /// Whether the action should appear at all.
    pub fn visible(&self) -> bool {
        self.state != ValidationState::Ineligible
    }

    /// Add a substitution value for the localized name lookups.
    pub fn with_localization(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.localization_info.insert(key.into(), value.into());
        self
    }

    /// Set the state from a two-valued enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state = if enabled {
            ValidationState::Active
        } else {
            ValidationState::Inactive
        };
    }
}

/// A named unit of validate/perform behavior.
///
/// Implementations are registered with an
/// [`ActionManager`](crate::ActionManager) and located by identifier when
/// a trigger fires. The same implementation can be instantiated multiple
/// times with different settings and registered under different
/// identifiers; override [`Action::identifier`] to return a stored
/// per-instance identifier in that case.
pub trait Action: Send + Sync + 'static {
    /// Identifier used to locate this action.
    ///
    /// The default derives from the implementing type's name with the last
    /// occurrence of `"Action"` removed, so `DoStuffAction` yields
    /// `"DoStuff"`.
    fn identifier(&self) -> Cow<'_, str> {
        Cow::Owned(derived_identifier(std::any::type_name::<Self>()))
    }

    /// Compute the current UI-facing state for this action.
    ///
    /// Typically an action just checks the context for the presence of
    /// keys. The default is fully active with default names.
    fn validate(&self, context: &ActionContext) -> Validation {
        let _ = context;
        Validation::new(self.identifier())
    }

    /// Perform the action synchronously.
    ///
    /// Synchronous actions override this method. The default logs a
    /// warning so a forgotten override is diagnosable rather than a crash.
    fn perform(&self, context: &ActionContext) {
        let _ = context;
        warn!(
            action = %self.identifier(),
            "action fired without a perform override"
        );
    }

    /// Perform the action, then call the completion exactly once.
    ///
    /// Asynchronous actions override this method and may defer the
    /// completion until their work finishes, possibly on another thread.
    /// Every exit path, including errors, must invoke the completion; see
    /// [`Completion`] for the hazard otherwise.
    fn perform_with_completion(&self, context: &ActionContext, completed: Completion) {
        self.perform(context);
        completed(Ok(()));
    }
}

impl fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({})", self.identifier())
    }
}

/// An action that forwards to another action chosen at dispatch time.
///
/// The determiner closure returns the identifier of the action to behave
/// like, and can return different identifiers at different times. Useful
/// for a button that should add either a book or a person depending on
/// which list is currently visible: implement `AddBook` and `AddPerson`
/// separately and bind the button to a `DelegatedAction` that picks one.
pub struct DelegatedAction {
    identifier: String,
    determiner: Box<dyn Fn(&ActionContext) -> String + Send + Sync>,
}

impl DelegatedAction {
    pub fn new(
        identifier: impl Into<String>,
        determiner: impl Fn(&ActionContext) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            determiner: Box::new(determiner),
        }
    }
}

impl Action for DelegatedAction {
    fn identifier(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identifier)
    }

    fn validate(&self, context: &ActionContext) -> Validation {
        let target = (self.determiner)(context);
        context
            .manager()
            .validate_with_info(&target, ActionInfo::with_sender(context.sender()))
    }

    fn perform(&self, context: &ActionContext) {
        let target = (self.determiner)(context);
        context
            .manager()
            .perform_with_info(&target, ActionInfo::with_sender(context.sender()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_identifier_strips_suffix() {
        struct DoStuffAction;
        impl Action for DoStuffAction {}

        assert_eq!(DoStuffAction.identifier(), "DoStuff");
    }

    #[test]
    fn test_default_identifier_strips_last_occurrence() {
        struct DoActionStuffAction;
        impl Action for DoActionStuffAction {}

        assert_eq!(DoActionStuffAction.identifier(), "DoActionStuff");
    }

    #[test]
    fn test_default_identifier_without_suffix() {
        struct DoStuff;
        impl Action for DoStuff {}

        assert_eq!(DoStuff.identifier(), "DoStuff");
    }

    #[test]
    fn test_validation_defaults() {
        let validation = Validation::new("Save");
        assert!(validation.enabled());
        assert!(validation.visible());
        assert_eq!(validation.full_name, "action.Save.title");
        assert_eq!(validation.short_name, "action.Save.short");
        assert_eq!(validation.icon_name, "action.Save.icon");
    }

    #[test]
    fn test_validation_localization_info() {
        let validation = Validation::new("Delete");
        assert!(validation.localization_info.is_empty());
        let json = serde_json::to_value(&validation).unwrap();
        assert!(json.get("localizationInfo").is_none());

        let validation = Validation::new("Delete").with_localization("count", 3);
        assert_eq!(validation.localization_info["count"], 3);
        let json = serde_json::to_value(&validation).unwrap();
        assert_eq!(json["localizationInfo"]["count"], 3);
    }

    #[test]
    fn test_validation_states() {
        let mut validation = Validation::with_state("Save", ValidationState::Inactive);
        assert!(!validation.enabled());
        assert!(validation.visible());

        validation.set_enabled(true);
        assert!(validation.enabled());

        let sentinel = Validation::unresolved("Missing");
        assert!(!sentinel.enabled());
        assert!(!sentinel.visible());
        assert_eq!(sentinel.identifier, "Missing");
    }
}
