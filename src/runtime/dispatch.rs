use super::{Interpreter, Receiver};
use crate::trace;
use crate::value::{Carrier, RuntimeError, Value};

impl Interpreter {
    /// Central message dispatch. Tries, in order: class messages, the
    /// `whileTrue:` loop, block invocation, user-defined methods, native
    /// built-ins, attribute access, and finally fails with DNU.
    pub(crate) fn dispatch(
        &mut self,
        receiver: Receiver,
        selector: &str,
        args: Vec<Value>,
        is_super: bool,
    ) -> Result<Value, RuntimeError> {
        match receiver {
            Receiver::Class(name) => {
                if is_super {
                    return Err(RuntimeError::internal(
                        "super cannot combine with a class receiver",
                    ));
                }
                self.dispatch_class_message(&name, selector, args)
            }
            Receiver::Value(value) => self.dispatch_value_message(value, selector, args, is_super),
        }
    }

    fn dispatch_class_message(
        &mut self,
        class_name: &str,
        selector: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        trace::send(self.frame_depth(), class_name, selector, "class-message");
        match (selector, args.len()) {
            ("new", 0) => self.class_new(class_name),
            ("from:", 1) => {
                let arg = args.into_iter().next().unwrap();
                self.class_from(class_name, arg)
            }
            ("read", 0) if class_name == "String" => match self.read_input_line()? {
                Some(line) => Ok(Value::string(line)),
                None => Ok(Value::Nil),
            },
            _ => Err(RuntimeError::does_not_understand(class_name, selector)),
        }
    }

    /// Instantiates a class. The nearest built-in ancestor decides the
    /// carrier; the singleton classes have nothing to instantiate and
    /// answer their singleton instead.
    pub(crate) fn class_new(&mut self, class_name: &str) -> Result<Value, RuntimeError> {
        match self.builtin_root(class_name)?.as_str() {
            "Integer" => Ok(Value::instance(class_name, Carrier::Int(0))),
            "String" => Ok(Value::instance(class_name, Carrier::Str(String::new()))),
            "Block" => Err(RuntimeError::does_not_understand(class_name, "new")),
            "Nil" if class_name == "Nil" => Ok(Value::Nil),
            "True" if class_name == "True" => Ok(Value::True),
            "False" if class_name == "False" => Ok(Value::False),
            _ => Ok(Value::instance(class_name, Carrier::Plain)),
        }
    }

    fn class_from(&mut self, class_name: &str, arg: Value) -> Result<Value, RuntimeError> {
        if self.find_class(class_name).is_none() {
            return Err(RuntimeError::internal(format!("unknown class {}", class_name)));
        }
        if !self.classes_related(class_name, arg.class_name()) {
            return Err(RuntimeError::value_error(format!(
                "{} from: cannot copy a {}",
                class_name,
                arg.class_name()
            )));
        }
        match class_name {
            "Nil" => Ok(Value::Nil),
            "True" => Ok(Value::True),
            "False" => Ok(Value::False),
            _ => Ok(arg.copy_with_class(class_name)),
        }
    }

    fn dispatch_value_message(
        &mut self,
        receiver: Value,
        selector: &str,
        args: Vec<Value>,
        is_super: bool,
    ) -> Result<Value, RuntimeError> {
        // The loop selector never resolves to a method; iterating here
        // keeps stack depth independent of the iteration count.
        if selector == "whileTrue:" && args.len() == 1 {
            trace::send(self.frame_depth(), receiver.class_name(), selector, "loop");
            let body = args.into_iter().next().unwrap();
            return self.run_while_true(receiver, body);
        }

        // Block invocation: declared arity, colon count and argument count
        // must agree, and the frame runs under the captured self.
        if selector.starts_with("value") {
            if let Some(block) = receiver.as_block() {
                let colons = selector.matches(':').count();
                if colons != args.len() || colons != block.arity() {
                    return Err(RuntimeError::does_not_understand(
                        receiver.class_name(),
                        selector,
                    ));
                }
                let node = block.node.clone();
                let defining_self = block.defining_self.clone();
                trace::send(self.frame_depth(), receiver.class_name(), selector, "block");
                return self.execute_block_with_args(
                    &node,
                    args,
                    defining_self,
                    receiver.class_name(),
                );
            }
        }

        // User-defined method, resolved from the dynamic class, or from
        // its parent under super.
        let start_class = if is_super {
            match self.parent_of(receiver.class_name()) {
                Some(parent) => parent.to_string(),
                None => {
                    return Err(RuntimeError::does_not_understand(
                        receiver.class_name(),
                        selector,
                    ))
                }
            }
        } else {
            receiver.class_name().to_string()
        };
        if let Some(body) = self.resolve_method(&start_class, selector) {
            trace::send(self.frame_depth(), receiver.class_name(), selector, "method");
            return self.execute_block_with_args(
                &body,
                args,
                Some(receiver.clone()),
                receiver.class_name(),
            );
        }

        // Native built-in, owned by the first built-in class on the
        // resolution order that serves this selector at this arity.
        let native = native_method_name(selector);
        for owner in self.mro_of(receiver.class_name()) {
            let is_builtin = self
                .find_class(&owner)
                .map(|def| def.builtin)
                .unwrap_or(false);
            if !is_builtin {
                continue;
            }
            if let Some(result) = self.run_native(&owner, &native, &receiver, &args)? {
                trace::send(self.frame_depth(), receiver.class_name(), selector, "native");
                return Ok(result);
            }
        }

        // Attribute read, then attribute write; both only for plain
        // identifier selectors, and never on the singletons.
        if args.is_empty() && is_valid_attr_name(selector) {
            if let Some(value) = receiver.get_attr(selector) {
                trace::send(self.frame_depth(), receiver.class_name(), selector, "attr-read");
                return Ok(value);
            }
        }
        if args.len() == 1 {
            if let Some(name) = selector.strip_suffix(':') {
                if is_valid_attr_name(name) && receiver.set_attr(name, args[0].clone()) {
                    trace::send(self.frame_depth(), receiver.class_name(), selector, "attr-write");
                    return Ok(receiver);
                }
            }
        }

        trace::send(self.frame_depth(), receiver.class_name(), selector, "dnu");
        Err(RuntimeError::does_not_understand(
            receiver.class_name(),
            selector,
        ))
    }

    fn run_while_true(&mut self, condition: Value, body: Value) -> Result<Value, RuntimeError> {
        loop {
            let test = self.send_value(condition.clone())?;
            if !matches!(test, Value::True) {
                return Ok(Value::Nil);
            }
            self.send_value(body.clone())?;
        }
    }
}

/// Selector to native routine name: keyword parts are capitalized and
/// joined, so `plus:` becomes Plus and `ifTrue:ifFalse:` IfTrueIfFalse.
pub(crate) fn native_method_name(selector: &str) -> String {
    let mut name = String::with_capacity(selector.len());
    for part in selector.split(':').filter(|part| !part.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Identifier acceptable as an attribute name: lowercase or underscore
/// start, ASCII alphanumeric tail, and none of the reserved words.
pub(crate) fn is_valid_attr_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !matches!(name, "class" | "self" | "super" | "nil" | "true" | "false")
}
