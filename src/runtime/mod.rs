use std::collections::HashMap;
use std::io::{self, BufRead, BufReader};

use crate::trace;
use crate::value::{RuntimeError, Value};
use crate::xml;

mod builtins;
mod builtins_bool;
mod builtins_int;
mod builtins_string;
mod dispatch;
mod eval;
mod frame;
mod registry;

pub(crate) use eval::Receiver;
use frame::Frame;
use registry::ClassDef;

/// The execution engine. Holds the class table (read-only once a program is
/// loaded), the activation-frame stack, the accumulated program output and
/// the line source backing `String read`.
pub struct Interpreter {
    classes: HashMap<String, ClassDef>,
    frames: Vec<Frame>,
    output: String,
    input: Box<dyn BufRead>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_input(Box::new(BufReader::new(io::stdin())))
    }

    /// An interpreter whose `String read` pulls lines from the given reader.
    pub fn with_input(input: Box<dyn BufRead>) -> Self {
        let mut interpreter = Self {
            classes: HashMap::new(),
            frames: Vec::new(),
            output: String::new(),
            input,
        };
        interpreter.register_builtin_classes();
        interpreter
    }

    /// Everything the program has printed so far. Valid after a failed run
    /// too; output written before an error is preserved.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Runs an AST document to completion and returns the program output.
    pub fn run(&mut self, source: &str) -> Result<String, RuntimeError> {
        let root = xml::parse_document(source)?;
        let program = xml::build_program(&root)?;
        self.load_program(&program)?;
        self.run_main()?;
        Ok(self.output.clone())
    }

    fn run_main(&mut self) -> Result<(), RuntimeError> {
        if self.find_class("Main").is_none() {
            return Err(RuntimeError::missing_main("class Main is not defined"));
        }
        let body = self
            .resolve_method("Main", "run")
            .ok_or_else(|| RuntimeError::missing_main("class Main has no method run"))?;
        if body.arity() != 0 {
            return Err(RuntimeError::missing_main("method run must take no parameters"));
        }
        trace::send(self.frame_depth(), "Main", "run", "entry");
        let receiver = self.class_new("Main")?;
        self.execute_block_with_args(&body, Vec::new(), Some(receiver), "Main")?;
        Ok(())
    }

    pub(crate) fn write_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// One line from the program input, without its terminator. None at
    /// end of input.
    pub(crate) fn read_input_line(&mut self) -> Result<Option<String>, RuntimeError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|err| RuntimeError::internal(format!("input read failed: {}", err)))?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Shorthand for the parameterless `value` send the control-flow
    /// builtins use to run their block arguments.
    pub(crate) fn send_value(&mut self, receiver: Value) -> Result<Value, RuntimeError> {
        self.dispatch(Receiver::Value(receiver), "value", Vec::new(), false)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Interpreter;
    use crate::value::ErrorCode;

    fn wrap(body: &str) -> String {
        format!(
            r#"<program language="SOL25">
  <class name="Main" parent="Object">
    <method selector="run">
      <block arity="0">{}</block>
    </method>
  </class>
</program>"#,
            body
        )
    }

    #[test]
    fn empty_run_produces_no_output() {
        let mut interp = Interpreter::new();
        let output = interp.run(&wrap("")).expect("run empty program");
        assert_eq!(output, "");
    }

    #[test]
    fn missing_main_class_is_a_startup_error() {
        let mut interp = Interpreter::new();
        let err = interp
            .run(r#"<program language="SOL25"></program>"#)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingMain);
    }

    #[test]
    fn run_with_parameters_is_a_startup_error() {
        let source = r#"<program language="SOL25">
  <class name="Main" parent="Object">
    <method selector="run">
      <block arity="1">
        <parameter name="x" order="1"/>
      </block>
    </method>
  </class>
</program>"#;
        let mut interp = Interpreter::new();
        let err = interp.run(source).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingMain);
    }

    #[test]
    fn run_may_be_inherited() {
        let source = r#"<program language="SOL25">
  <class name="Base" parent="Object">
    <method selector="run">
      <block arity="0">
        <assign order="1">
          <var name="x"/>
          <expr>
            <send selector="print">
              <expr><literal class="String" value="inherited"/></expr>
            </send>
          </expr>
        </assign>
      </block>
    </method>
  </class>
  <class name="Main" parent="Base"></class>
</program>"#;
        let mut interp = Interpreter::new();
        let output = interp.run(source).expect("run inherited program");
        assert_eq!(output, "inherited");
    }

    #[test]
    fn frame_stack_is_empty_after_a_run() {
        let mut interp = Interpreter::new();
        interp
            .run(&wrap(
                r#"<assign order="1">
  <var name="x"/>
  <expr><literal class="Integer" value="1"/></expr>
</assign>"#,
            ))
            .unwrap();
        assert_eq!(interp.frame_depth(), 0);
    }
}
