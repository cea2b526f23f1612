use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::BlockNode;

mod error;

pub use error::{ErrorCode, RuntimeError};

/// A runtime value. The three singletons are unit variants so that identity
/// and equality coincide for them by construction; everything else lives
/// behind a shared `Obj` so assignments alias rather than copy.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    True,
    False,
    Obj(Rc<Obj>),
}

/// Heap-shared object: a dynamic class name, the payload carried for
/// built-in ancestry, and a mutable attribute table. The class name and
/// carrier are fixed at construction; only attributes change.
#[derive(Debug)]
pub struct Obj {
    class_name: String,
    carrier: Carrier,
    attrs: RefCell<HashMap<String, Value>>,
}

/// Payload a value carries for its built-in ancestor. `Plain` covers
/// instances of classes descending straight from Object (and from the
/// singleton classes, which need no payload).
#[derive(Debug, Clone)]
pub(crate) enum Carrier {
    Plain,
    Int(i64),
    Str(String),
    Block(BlockData),
}

/// A captured block literal: the body it will run, and the `self` observed
/// where the literal was written. The capture is a strong handle; a block
/// may outlive its defining frame and still answer `self`.
#[derive(Debug, Clone)]
pub(crate) struct BlockData {
    pub(crate) node: Rc<BlockNode>,
    pub(crate) defining_self: Option<Value>,
}

impl BlockData {
    pub(crate) fn arity(&self) -> usize {
        self.node.arity()
    }
}

impl Value {
    pub(crate) fn bool(flag: bool) -> Value {
        if flag { Value::True } else { Value::False }
    }

    pub(crate) fn int(n: i64) -> Value {
        Value::instance("Integer", Carrier::Int(n))
    }

    pub(crate) fn string(s: impl Into<String>) -> Value {
        Value::instance("String", Carrier::Str(s.into()))
    }

    pub(crate) fn block(node: Rc<BlockNode>, defining_self: Option<Value>) -> Value {
        Value::instance(
            "Block",
            Carrier::Block(BlockData {
                node,
                defining_self,
            }),
        )
    }

    pub(crate) fn instance(class_name: &str, carrier: Carrier) -> Value {
        Value::Obj(Rc::new(Obj {
            class_name: class_name.to_string(),
            carrier,
            attrs: RefCell::new(HashMap::new()),
        }))
    }

    /// Fresh value with the given class name, copying this value's carrier
    /// and attribute table. Singleton sources contribute an empty payload.
    pub(crate) fn copy_with_class(&self, class_name: &str) -> Value {
        let (carrier, attrs) = match self {
            Value::Obj(obj) => (obj.carrier.clone(), obj.attrs.borrow().clone()),
            _ => (Carrier::Plain, HashMap::new()),
        };
        Value::Obj(Rc::new(Obj {
            class_name: class_name.to_string(),
            carrier,
            attrs: RefCell::new(attrs),
        }))
    }

    /// The dynamic class name: the built-in name for bare values, or the
    /// (possibly user-defined) name the value was constructed with.
    pub fn class_name(&self) -> &str {
        match self {
            Value::Nil => "Nil",
            Value::True => "True",
            Value::False => "False",
            Value::Obj(obj) => &obj.class_name,
        }
    }

    pub(crate) fn as_int(&self) -> Option<i64> {
        match self {
            Value::Obj(obj) => match obj.carrier {
                Carrier::Int(n) => Some(n),
                _ => None,
            },
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            Value::Obj(obj) => match &obj.carrier {
                Carrier::Str(s) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    pub(crate) fn as_block(&self) -> Option<&BlockData> {
        match self {
            Value::Obj(obj) => match &obj.carrier {
                Carrier::Block(data) => Some(data),
                _ => None,
            },
            _ => None,
        }
    }

    /// Reference identity: singleton sameness for the singletons, shared
    /// pointer identity for everything else.
    pub(crate) fn identical_to(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::True, Value::True) => true,
            (Value::False, Value::False) => true,
            (Value::Obj(a), Value::Obj(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<Value> {
        match self {
            Value::Obj(obj) => obj.attrs.borrow().get(name).cloned(),
            _ => None,
        }
    }

    /// Stores an attribute, creating it on first write. Returns false for
    /// the singletons, which carry no attribute table.
    pub(crate) fn set_attr(&self, name: &str, value: Value) -> bool {
        match self {
            Value::Obj(obj) => {
                obj.attrs.borrow_mut().insert(name.to_string(), value);
                true
            }
            _ => false,
        }
    }
}
