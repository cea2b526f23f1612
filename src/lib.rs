//! Runtime core of an interpreter for SOL25, a small Smalltalk-flavored
//! object language. The crate consumes an already-validated program as an
//! XML document and executes it: expression evaluation, message dispatch
//! with inheritance-aware resolution, block closures over `self`, and the
//! classified runtime errors the driver maps to exit codes.

mod ast;
mod runtime;
mod trace;
mod value;
mod xml;

pub use runtime::Interpreter;
pub use value::{ErrorCode, RuntimeError, Value};
