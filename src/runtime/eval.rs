use std::rc::Rc;

use super::{Frame, Interpreter};
use crate::ast::{BlockNode, ExprNode, LiteralNode};
use crate::value::{RuntimeError, Value};

/// What an expression evaluates to. A class name is not a value; it exists
/// only so a send can recognize a class-message receiver. Everywhere else
/// it must collapse into a value, and cannot.
pub(crate) enum Receiver {
    Value(Value),
    Class(String),
}

impl Receiver {
    pub(crate) fn into_value(self) -> Result<Value, RuntimeError> {
        match self {
            Receiver::Value(value) => Ok(value),
            Receiver::Class(name) => Err(RuntimeError::internal(format!(
                "class name {} used where a value is required",
                name
            ))),
        }
    }
}

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, expr: &ExprNode) -> Result<Receiver, RuntimeError> {
        match expr {
            ExprNode::Literal(literal) => self.eval_literal(literal),
            ExprNode::Var(name) => self.eval_var(name).map(Receiver::Value),
            ExprNode::Block(node) => {
                let defining_self = self.top_frame()?.self_value();
                Ok(Receiver::Value(Value::block(node.clone(), defining_self)))
            }
            ExprNode::Send {
                selector,
                receiver,
                args,
            } => {
                let is_super = matches!(receiver.as_ref(), ExprNode::Var(name) if name == "super");
                let target = self.eval_expr(receiver)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?.into_value()?);
                }
                self.dispatch(target, selector, values, is_super)
                    .map(Receiver::Value)
            }
        }
    }

    fn eval_literal(&mut self, literal: &LiteralNode) -> Result<Receiver, RuntimeError> {
        Ok(match literal {
            LiteralNode::Nil => Receiver::Value(Value::Nil),
            LiteralNode::True => Receiver::Value(Value::True),
            LiteralNode::False => Receiver::Value(Value::False),
            LiteralNode::Integer(n) => Receiver::Value(Value::int(*n)),
            // Escape sequences stay encoded; only `print` decodes them.
            LiteralNode::Str(s) => Receiver::Value(Value::string(s.clone())),
            LiteralNode::Class(name) => Receiver::Class(name.clone()),
        })
    }

    fn eval_var(&mut self, name: &str) -> Result<Value, RuntimeError> {
        match name {
            "nil" => Ok(Value::Nil),
            "true" => Ok(Value::True),
            "false" => Ok(Value::False),
            "self" | "super" => self.top_frame()?.self_value().ok_or_else(|| {
                RuntimeError::internal("no receiver is bound in the current frame")
            }),
            _ => self.top_frame()?.read(name),
        }
    }

    /// Runs a block body in a fresh frame: binds the arguments, executes
    /// the assignments in order, and yields the last assigned value (Nil
    /// for an empty body). The frame is popped on the error path too.
    pub(crate) fn execute_block_with_args(
        &mut self,
        block: &Rc<BlockNode>,
        args: Vec<Value>,
        slf: Option<Value>,
        receiver_class: &str,
    ) -> Result<Value, RuntimeError> {
        if block.arity() != args.len() {
            return Err(RuntimeError::does_not_understand(
                receiver_class,
                &value_selector(args.len()),
            ));
        }
        let frame = Frame::new(slf, &block.parameters, args)?;
        self.push_frame(frame);
        let result = self.run_block_body(block);
        self.pop_frame()?;
        result
    }

    fn run_block_body(&mut self, block: &BlockNode) -> Result<Value, RuntimeError> {
        let mut last = Value::Nil;
        for assign in &block.assigns {
            let value = self.eval_expr(&assign.expr)?.into_value()?;
            self.top_frame()?.write(&assign.var, value.clone())?;
            last = value;
        }
        Ok(last)
    }
}

/// The selector a block invocation with `argc` arguments would have used.
pub(crate) fn value_selector(argc: usize) -> String {
    if argc == 0 {
        "value".to_string()
    } else {
        "value:".repeat(argc)
    }
}
