use std::collections::HashMap;

use crate::{
    ast::location::Location,
    error::{InternalError, RuntimeError},
};

/// One named slot in a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<T> {
    /// Whether assignments to the name are allowed.
    pub mutable: bool,
    /// What the name is bound to: a type while validating, a value while
    /// running.
    pub value:   T,
}

/// The scopes of one function call.
///
/// The outermost scope holds the parameters; every block entered pushes a
/// child scope. Lookups walk from the innermost scope outwards and never
/// leave the call.
#[derive(Debug, Clone)]
pub struct Frame<T> {
    call:   HashMap<String, Binding<T>>,
    nested: Vec<HashMap<String, Binding<T>>>,
}

impl<T> Default for Frame<T> {
    fn default() -> Self {
        Self { call:   HashMap::new(),
               nested: Vec::new(), }
    }
}

impl<T> Frame<T> {
    /// Creates a frame with a single, empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a nested scope.
    pub fn push_scope(&mut self) {
        self.nested.push(HashMap::new());
    }

    /// Leaves the innermost scope, dropping its bindings.
    ///
    /// # Errors
    /// `ScopeUnderflow` when only the call's own scope is left.
    pub fn pop_scope(&mut self) -> Result<(), InternalError> {
        self.nested
            .pop()
            .map(|_| ())
            .ok_or(InternalError::ScopeUnderflow)
    }

    /// Binds a name in the innermost scope. Outer bindings of the same name
    /// are shadowed until the scope is left.
    ///
    /// # Errors
    /// `VariableRedeclaration` if the innermost scope already binds it.
    pub fn declare(&mut self,
                   name: &str,
                   binding: Binding<T>,
                   location: Location)
                   -> Result<(), RuntimeError> {
        let scope = match self.nested.last_mut() {
            Some(scope) => scope,
            None => &mut self.call,
        };
        if scope.contains_key(name) {
            return Err(RuntimeError::VariableRedeclaration { name: name.to_string(),
                                                             location });
        }
        scope.insert(name.to_string(), binding);
        Ok(())
    }

    /// The nearest binding of a name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding<T>> {
        self.nested
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.call.get(name))
    }

    /// Mutable access to the nearest binding of a name, so that writes from
    /// a nested block update the scope that declared it.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding<T>> {
        match self.nested.iter_mut().rev().find(|scope| scope.contains_key(name)) {
            Some(scope) => scope.get_mut(name),
            None => self.call.get_mut(name),
        }
    }

    /// Like [`Frame::lookup`], failing for unbound names.
    ///
    /// # Errors
    /// `UndefinedVariable` if nothing binds the name.
    pub fn get(&self, name: &str, location: Location) -> Result<&Binding<T>, RuntimeError> {
        self.lookup(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             location })
    }

    /// Like [`Frame::lookup_mut`], failing for unbound names.
    ///
    /// # Errors
    /// `UndefinedVariable` if nothing binds the name.
    pub fn get_mut(&mut self,
                   name: &str,
                   location: Location)
                   -> Result<&mut Binding<T>, RuntimeError> {
        self.lookup_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             location })
    }
}

/// The stack of active calls, bounded in depth.
///
/// A call starts from an empty frame: functions see their parameters and
/// their own locals, never their caller's.
#[derive(Debug, Clone)]
pub struct CallStack<T> {
    frames:    Vec<Frame<T>>,
    max_depth: usize,
}

impl<T> CallStack<T> {
    /// Creates an empty stack admitting at most `max_depth` nested calls.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { frames: Vec::new(),
               max_depth }
    }

    /// Number of active calls.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enters a call.
    ///
    /// # Errors
    /// `MaximumRecursion` when the stack is already at its limit.
    pub fn push(&mut self, frame: Frame<T>, location: Location) -> Result<(), RuntimeError> {
        if self.frames.len() >= self.max_depth {
            return Err(RuntimeError::MaximumRecursion { depth: self.max_depth,
                                                        location });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Leaves the innermost call.
    ///
    /// # Errors
    /// `MissingFrame` on an empty stack.
    pub fn pop(&mut self) -> Result<Frame<T>, InternalError> {
        self.frames.pop().ok_or(InternalError::MissingFrame)
    }

    /// The innermost call's frame.
    ///
    /// # Errors
    /// `MissingFrame` on an empty stack.
    pub fn current(&self) -> Result<&Frame<T>, InternalError> {
        self.frames.last().ok_or(InternalError::MissingFrame)
    }

    /// Mutable access to the innermost call's frame.
    ///
    /// # Errors
    /// `MissingFrame` on an empty stack.
    pub fn current_mut(&mut self) -> Result<&mut Frame<T>, InternalError> {
        self.frames.last_mut().ok_or(InternalError::MissingFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, CallStack, Frame};
    use crate::{
        ast::location::Location,
        error::{InternalError, RuntimeError},
    };

    fn constant(value: i32) -> Binding<i32> {
        Binding { mutable: false,
                  value }
    }

    #[test]
    fn inner_scopes_shadow_until_popped() {
        let mut frame = Frame::new();
        frame.declare("x", constant(1), Location::default()).unwrap();
        frame.push_scope();
        frame.declare("x", constant(2), Location::default()).unwrap();
        assert_eq!(frame.lookup("x").map(|b| b.value), Some(2));
        frame.pop_scope().unwrap();
        assert_eq!(frame.lookup("x").map(|b| b.value), Some(1));
    }

    #[test]
    fn writes_reach_the_declaring_scope() {
        let mut frame = Frame::new();
        frame.declare("x", constant(1), Location::default()).unwrap();
        frame.push_scope();
        frame.get_mut("x", Location::default()).unwrap().value = 5;
        frame.pop_scope().unwrap();
        assert_eq!(frame.lookup("x").map(|b| b.value), Some(5));
    }

    #[test]
    fn redeclaration_in_the_same_scope_fails() {
        let mut frame = Frame::new();
        frame.declare("x", constant(1), Location::default()).unwrap();
        let err = frame.declare("x", constant(2), Location::default()).unwrap_err();
        assert!(matches!(err, RuntimeError::VariableRedeclaration { .. }));
    }

    #[test]
    fn the_call_scope_cannot_be_popped() {
        let mut frame = Frame::<i32>::new();
        assert_eq!(frame.pop_scope(), Err(InternalError::ScopeUnderflow));
    }

    #[test]
    fn depth_is_bounded() {
        let mut stack = CallStack::<i32>::new(2);
        stack.push(Frame::new(), Location::default()).unwrap();
        stack.push(Frame::new(), Location::default()).unwrap();
        let err = stack.push(Frame::new(), Location::default()).unwrap_err();
        assert!(matches!(err, RuntimeError::MaximumRecursion { depth: 2, .. }));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn calls_do_not_see_their_caller() {
        let mut stack = CallStack::new(8);
        let mut caller = Frame::new();
        caller.declare("x", constant(1), Location::default()).unwrap();
        stack.push(caller, Location::default()).unwrap();
        stack.push(Frame::new(), Location::default()).unwrap();
        assert!(stack.current().unwrap().lookup("x").is_none());
        stack.pop().unwrap();
        assert!(stack.current().unwrap().lookup("x").is_some());
    }
}
