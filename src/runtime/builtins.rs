use super::Interpreter;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// Runs the native routine `native` as served by the built-in class
    /// `owner`, or reports that the owner has no such routine at this
    /// arity so the ladder can continue.
    pub(super) fn run_native(
        &mut self,
        owner: &str,
        native: &str,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        match owner {
            "Object" => self.object_native(native, receiver, args),
            "Integer" => self.integer_native(native, receiver, args),
            "String" => self.string_native(native, receiver, args),
            "Block" => block_native(native, args),
            "True" | "False" => self.boolean_native(owner, native, receiver, args),
            "Nil" => nil_native(native, args),
            _ => Ok(None),
        }
    }

    fn object_native(
        &mut self,
        native: &str,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match (native, args.len()) {
            ("IdenticalTo", 1) => Value::bool(receiver.identical_to(&args[0])),
            // Equality defaults to identity; Integer and String override.
            ("EqualTo", 1) => Value::bool(receiver.identical_to(&args[0])),
            ("AsString", 0) => Value::string(""),
            ("IsNumber", 0) | ("IsString", 0) | ("IsBlock", 0) | ("IsNil", 0) => Value::False,
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

fn block_native(native: &str, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    match (native, args.len()) {
        ("IsBlock", 0) => Ok(Some(Value::True)),
        _ => Ok(None),
    }
}

fn nil_native(native: &str, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
    let value = match (native, args.len()) {
        ("AsString", 0) => Value::string("nil"),
        ("IsNil", 0) => Value::True,
        _ => return Ok(None),
    };
    Ok(Some(value))
}
