//! An environment is the context in which an expression is evaluated. It is a stack of frames,
//! where each [Frame] holds the bindings of one lexical scope.
//!
//! Frames are shared, never copied: a closure keeps the environment it was created in, and every
//! mutation made through one holder of a frame is seen by all the others.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::error::{Result, RuntimeError};
use crate::value::Value;

pub type FrameRef = Rc<RefCell<Frame>>;

/// How many procedure and macro calls can be nested before evaluation fails with
/// [RuntimeError::RecursionLimit].
pub const MAX_CALL_DEPTH: usize = 10_000;

/// The bindings of a single scope, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    variables: IndexMap<String, Value, FxBuildHasher>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame from parallel lists of names and values.
    pub fn from_bindings(names: Vec<String>, values: Vec<Value>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(RuntimeError::ArityMismatch(names.len(), values.len()));
        }

        Ok(names.into_iter().zip(values).collect())
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.variables.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.variables.contains_key(id)
    }

    /// Inserts or overwrites a binding.
    pub fn insert(&mut self, id: String, value: Value) {
        self.variables.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl FromIterator<(String, Value)> for Frame {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}

/// Calls in progress, shared by every environment derived from the same root.
#[derive(Debug)]
struct CallDepth {
    current: Cell<usize>,
    limit: Cell<usize>,
}

/// Marks a call in progress, the call ends when the guard is dropped.
#[must_use]
pub struct CallGuard {
    calls: Rc<CallDepth>,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.calls.current.set(self.calls.current.get() - 1);
    }
}

/// A stack of shared frames. Cloning an environment is cheap and both clones keep pointing to the
/// same frames.
#[derive(Clone)]
pub struct Environment {
    current: FrameRef,
    enclosing: im_rc::Vector<FrameRef>,
    calls: Rc<CallDepth>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment with a single empty frame.
    pub fn new() -> Self {
        Self::from_frame(Frame::new())
    }

    /// Creates an environment whose outermost frame is `frame`.
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            current: Rc::new(RefCell::new(frame)),
            enclosing: im_rc::Vector::new(),
            calls: Rc::new(CallDepth {
                current: Cell::new(0),
                limit: Cell::new(MAX_CALL_DEPTH),
            }),
        }
    }

    /// Pushes a new innermost frame.
    pub fn push_frame(&mut self, frame: Frame) {
        let frame = Rc::new(RefCell::new(frame));
        let outer = std::mem::replace(&mut self.current, frame);
        self.enclosing.push_back(outer);
    }

    /// Returns a new environment with `frame` on top of this one, leaving this one untouched.
    pub fn extend(&self, frame: Frame) -> Environment {
        let mut env = self.clone();
        env.push_frame(frame);
        env
    }

    /// The number of frames in the stack.
    pub fn depth(&self) -> usize {
        self.enclosing.len() + 1
    }

    pub fn current_frame(&self) -> FrameRef {
        self.current.clone()
    }

    /// Enters a procedure or macro call, failing when too many calls are already in progress.
    pub fn enter_call(&self) -> Result<CallGuard> {
        let depth = self.calls.current.get();
        let limit = self.calls.limit.get();

        if depth >= limit {
            return Err(RuntimeError::RecursionLimit(limit));
        }

        self.calls.current.set(depth + 1);

        Ok(CallGuard {
            calls: self.calls.clone(),
        })
    }

    /// The number of calls in progress.
    pub fn call_depth(&self) -> usize {
        self.calls.current.get()
    }

    /// Changes the bound on nested calls. It applies to every environment sharing this one's root.
    pub fn set_call_limit(&self, limit: usize) {
        self.calls.limit.set(limit);
    }

    /// Frames from the innermost to the outermost.
    fn frames(&self) -> impl Iterator<Item = &FrameRef> {
        std::iter::once(&self.current).chain(self.enclosing.iter().rev())
    }

    pub fn find(&self, id: &str) -> Option<Value> {
        self.frames()
            .find_map(|frame| frame.borrow().get(id).cloned())
    }

    pub fn lookup(&self, id: &str) -> Result<Value> {
        self.find(id)
            .ok_or_else(|| RuntimeError::UnboundIdentifier(id.to_string()))
    }

    pub fn is_defined(&self, id: &str) -> bool {
        self.frames().any(|frame| frame.borrow().contains(id))
    }

    /// Installs or overwrites a binding in the innermost frame.
    pub fn define(&self, id: String, value: Value) {
        self.current.borrow_mut().insert(id, value);
    }

    /// Mutates the nearest frame that already binds `id`.
    pub fn set(&self, id: &str, value: Value) -> Result<()> {
        let Some(frame) = self.frames().find(|frame| frame.borrow().contains(id)) else {
            return Err(RuntimeError::UnboundAssignment(id.to_string()));
        };

        frame.borrow_mut().insert(id.to_string(), value);

        Ok(())
    }
}
