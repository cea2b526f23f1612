use std::collections::HashMap;

use super::Interpreter;
use crate::value::{RuntimeError, Value};

/// Activation record of one block or method invocation. Parameters are
/// sealed at construction; locals appear on first assignment.
#[derive(Debug)]
pub(crate) struct Frame {
    slf: Option<Value>,
    params: HashMap<String, Value>,
    locals: HashMap<String, Value>,
}

impl Frame {
    pub(crate) fn new(
        slf: Option<Value>,
        names: &[String],
        args: Vec<Value>,
    ) -> Result<Self, RuntimeError> {
        if names.len() != args.len() {
            return Err(RuntimeError::internal(
                "parameter and argument counts diverged past the arity check",
            ));
        }
        let params = names.iter().cloned().zip(args).collect();
        Ok(Self {
            slf,
            params,
            locals: HashMap::new(),
        })
    }

    pub(crate) fn self_value(&self) -> Option<Value> {
        self.slf.clone()
    }

    pub(crate) fn read(&self, name: &str) -> Result<Value, RuntimeError> {
        self.params
            .get(name)
            .or_else(|| self.locals.get(name))
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    pub(crate) fn write(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if self.params.contains_key(name) {
            return Err(RuntimeError::assign_to_parameter(name));
        }
        self.locals.insert(name.to_string(), value);
        Ok(())
    }
}

impl Interpreter {
    pub(crate) fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) -> Result<Frame, RuntimeError> {
        self.frames
            .pop()
            .ok_or_else(|| RuntimeError::internal("pop from an empty frame stack"))
    }

    pub(crate) fn top_frame(&mut self) -> Result<&mut Frame, RuntimeError> {
        self.frames
            .last_mut()
            .ok_or_else(|| RuntimeError::internal("no active frame"))
    }

    pub(crate) fn frame_depth(&self) -> usize {
        self.frames.len()
    }
}
