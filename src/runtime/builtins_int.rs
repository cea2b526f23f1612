use super::Interpreter;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    pub(super) fn integer_native(
        &mut self,
        native: &str,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match (native, args.len()) {
            ("EqualTo", 1) => {
                let lhs = int_carrier(receiver, native)?;
                Value::bool(args[0].as_int() == Some(lhs))
            }
            ("Plus", 1) => Value::int(int_carrier(receiver, native)? + int_operand(&args[0], "plus:")?),
            ("Minus", 1) => {
                Value::int(int_carrier(receiver, native)? - int_operand(&args[0], "minus:")?)
            }
            ("MultiplyBy", 1) => Value::int(
                int_carrier(receiver, native)? * int_operand(&args[0], "multiplyBy:")?,
            ),
            ("DivBy", 1) => {
                let lhs = int_carrier(receiver, native)?;
                let rhs = int_operand(&args[0], "divBy:")?;
                if rhs == 0 {
                    return Err(RuntimeError::value_error("division by zero in divBy:"));
                }
                Value::int(lhs / rhs)
            }
            ("GreaterThan", 1) => {
                let lhs = int_carrier(receiver, native)?;
                Value::bool(lhs > int_operand(&args[0], "greaterThan:")?)
            }
            ("AsString", 0) => Value::string(int_carrier(receiver, native)?.to_string()),
            ("AsInteger", 0) => receiver.clone(),
            ("IsNumber", 0) => Value::True,
            ("TimesRepeat", 1) => {
                let count = int_carrier(receiver, native)?;
                let body = args[0].clone();
                for index in 1..=count.max(0) {
                    self.dispatch(
                        super::Receiver::Value(body.clone()),
                        "value:",
                        vec![Value::int(index)],
                        false,
                    )?;
                }
                receiver.clone()
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

fn int_carrier(receiver: &Value, native: &str) -> Result<i64, RuntimeError> {
    receiver.as_int().ok_or_else(|| {
        RuntimeError::internal(format!("{} reached a receiver with no integer payload", native))
    })
}

fn int_operand(arg: &Value, selector: &str) -> Result<i64, RuntimeError> {
    arg.as_int().ok_or_else(|| {
        RuntimeError::value_error(format!(
            "{} expects an Integer argument, got {}",
            selector,
            arg.class_name()
        ))
    })
}
