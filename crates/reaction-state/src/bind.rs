//! Two-phase action binding.
//!
//! A view layer first receives a group's creators and thunks unbound
//! ([`DeferredActions`]), binds them to a dispatcher ([`DispatchBound`]) and,
//! once its props are known, binds those too ([`ContextBound`]). Invoking a
//! bound name either dispatches the action its creator builds or runs the
//! thunk with the props and the dispatcher.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::reaction::Thunk;
use crate::{Action, ActionTable, ReactionError, ReactionResult, StateValue};

/// Something actions can be dispatched to.
pub trait Dispatch {
    /// Dispatch one action.
    fn dispatch(&mut self, action: Action) -> ReactionResult<()>;

    /// The current state.
    fn state(&self) -> StateValue;
}

impl<T: Dispatch + ?Sized> Dispatch for &mut T {
    fn dispatch(&mut self, action: Action) -> ReactionResult<()> {
        (**self).dispatch(action)
    }

    fn state(&self) -> StateValue {
        (**self).state()
    }
}

/// What a thunk is called with besides the dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct ThunkScope<'a> {
    /// Props bound by the caller.
    pub props: &'a StateValue,
    /// The group's action creators by bare name.
    pub actions: &'a ActionTable,
    /// Arguments of this invocation.
    pub args: &'a [Value],
}

impl ThunkScope<'_> {
    /// Build an action of the thunk's group.
    pub fn action(&self, name: &str, args: &[Value]) -> ReactionResult<Action> {
        self.actions
            .get(name)
            .map(|creator| creator.create(args))
            .ok_or_else(|| ReactionError::unknown_action(name))
    }
}

/// Creators and thunks of one group, not yet bound.
#[derive(Clone, Debug, Default)]
pub struct DeferredActions {
    actions: ActionTable,
    thunks: IndexMap<String, Thunk>,
}

impl DeferredActions {
    pub(crate) fn new(actions: ActionTable, thunks: IndexMap<String, Thunk>) -> Self {
        Self { actions, thunks }
    }

    /// Bindable names: creators first, then thunks.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions
            .keys()
            .chain(self.thunks.keys())
            .map(String::as_str)
    }

    /// True when `name` can be invoked.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name) || self.thunks.contains_key(name)
    }

    /// Bind to a dispatcher.
    pub fn bind<D: Dispatch>(self, dispatch: D) -> DispatchBound<D> {
        DispatchBound {
            deferred: self,
            dispatch,
        }
    }

    fn invoke<D: Dispatch>(
        &self,
        dispatch: &mut D,
        props: &StateValue,
        name: &str,
        args: &[Value],
    ) -> ReactionResult<()> {
        if let Some(creator) = self.actions.get(name) {
            let action = creator.create(args);
            trace!(action = action.action_type(), "dispatching bound action");
            return dispatch.dispatch(action);
        }
        if let Some(thunk) = self.thunks.get(name) {
            trace!(thunk = name, "running bound thunk");
            let scope = ThunkScope {
                props,
                actions: &self.actions,
                args,
            };
            return thunk.run(&scope, dispatch);
        }
        Err(ReactionError::unknown_action(name))
    }
}

/// Actions bound to a dispatcher, awaiting props.
#[derive(Debug)]
pub struct DispatchBound<D> {
    deferred: DeferredActions,
    dispatch: D,
}

impl<D: Dispatch> DispatchBound<D> {
    /// Invoke `name` with explicit props.
    pub fn invoke(&mut self, props: &StateValue, name: &str, args: &[Value]) -> ReactionResult<()> {
        self.deferred.invoke(&mut self.dispatch, props, name, args)
    }

    /// Bind the caller's props.
    pub fn with_context(self, props: impl Into<StateValue>) -> ContextBound<D> {
        ContextBound {
            bound: self,
            props: props.into(),
        }
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatch
    }

    /// Give the dispatcher back.
    pub fn into_inner(self) -> D {
        self.dispatch
    }
}

/// Actions bound to a dispatcher and props.
#[derive(Debug)]
pub struct ContextBound<D> {
    bound: DispatchBound<D>,
    props: StateValue,
}

impl<D: Dispatch> ContextBound<D> {
    /// Invoke `name` with the bound props.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> ReactionResult<()> {
        let Self { bound, props } = self;
        bound.invoke(props, name, args)
    }

    /// The bound props.
    #[inline]
    pub fn props(&self) -> &StateValue {
        &self.props
    }

    /// Replace the bound props.
    pub fn set_props(&mut self, props: impl Into<StateValue>) {
        self.props = props.into();
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &D {
        self.bound.dispatcher()
    }

    /// Give the dispatcher back.
    pub fn into_inner(self) -> D {
        self.bound.into_inner()
    }
}
