use super::Interpreter;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// The logic selectors of True and False. Which class owns the routine
    /// decides the polarity, so subclasses of either keep their behavior
    /// through the resolution order. Block arguments run by being sent
    /// `value`, and at most one of them ever runs.
    pub(super) fn boolean_native(
        &mut self,
        owner: &str,
        native: &str,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let truthy = owner == "True";
        let value = match (native, args.len()) {
            ("Not", 0) => Value::bool(!truthy),
            ("And", 1) => {
                if truthy {
                    self.send_value(args[0].clone())?
                } else {
                    receiver.clone()
                }
            }
            ("Or", 1) => {
                if truthy {
                    receiver.clone()
                } else {
                    self.send_value(args[0].clone())?
                }
            }
            ("IfTrueIfFalse", 2) => {
                let branch = if truthy { &args[0] } else { &args[1] };
                self.send_value(branch.clone())?
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}
