use std::collections::HashMap;
use std::rc::Rc;

use super::Interpreter;
use crate::ast::{BlockNode, Program};
use crate::trace;
use crate::value::RuntimeError;

/// One entry in the class table. Built-ins have empty method tables; their
/// selectors are served natively by the dispatcher.
#[derive(Debug, Clone)]
pub(crate) struct ClassDef {
    pub(crate) parent: Option<String>,
    pub(crate) methods: HashMap<String, Rc<BlockNode>>,
    pub(crate) builtin: bool,
}

const BUILTIN_CLASSES: &[(&str, Option<&str>)] = &[
    ("Object", None),
    ("Nil", Some("Object")),
    ("True", Some("Object")),
    ("False", Some("Object")),
    ("Integer", Some("Object")),
    ("String", Some("Object")),
    ("Block", Some("Object")),
];

impl Interpreter {
    pub(super) fn register_builtin_classes(&mut self) {
        for (name, parent) in BUILTIN_CLASSES {
            self.classes.insert(
                (*name).to_string(),
                ClassDef {
                    parent: parent.map(str::to_string),
                    methods: HashMap::new(),
                    builtin: true,
                },
            );
        }
    }

    /// Installs the user classes of a program. The front end has already
    /// rejected duplicate names, duplicate selectors and broken parent
    /// chains; seeing one anyway is an internal error.
    pub(crate) fn load_program(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for class in &program.classes {
            if self.classes.contains_key(&class.name) {
                return Err(RuntimeError::internal(format!(
                    "class {} is defined twice",
                    class.name
                )));
            }
            let mut methods = HashMap::new();
            for method in &class.methods {
                if methods
                    .insert(method.selector.clone(), method.body.clone())
                    .is_some()
                {
                    return Err(RuntimeError::internal(format!(
                        "class {} defines selector '{}' twice",
                        class.name, method.selector
                    )));
                }
            }
            trace::class_loaded(&class.name, &class.parent, methods.len());
            self.classes.insert(
                class.name.clone(),
                ClassDef {
                    parent: Some(class.parent.clone()),
                    methods,
                    builtin: false,
                },
            );
        }
        for class in &program.classes {
            self.check_parent_chain(&class.name)?;
        }
        Ok(())
    }

    fn check_parent_chain(&self, name: &str) -> Result<(), RuntimeError> {
        let mut current = name;
        let mut steps = 0;
        loop {
            let def = self.classes.get(current).ok_or_else(|| {
                RuntimeError::internal(format!("class {} has undefined parent {}", name, current))
            })?;
            match &def.parent {
                None => return Ok(()),
                Some(parent) => {
                    steps += 1;
                    if steps > self.classes.len() {
                        return Err(RuntimeError::internal(format!(
                            "inheritance cycle through class {}",
                            name
                        )));
                    }
                    current = parent;
                }
            }
        }
    }

    pub(crate) fn find_class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub(crate) fn parent_of(&self, name: &str) -> Option<&str> {
        self.classes.get(name).and_then(|def| def.parent.as_deref())
    }

    /// The resolution order of a class: the class itself, then its parents
    /// up to the root.
    pub(crate) fn mro_of(&self, name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(name.to_string());
        while let Some(class_name) = current {
            current = self.parent_of(&class_name).map(str::to_string);
            chain.push(class_name);
        }
        chain
    }

    /// Walks the parent chain from `start` and returns the first body
    /// defined for the selector, or None when no class in the chain has it.
    pub(crate) fn resolve_method(&self, start: &str, selector: &str) -> Option<Rc<BlockNode>> {
        for class_name in self.mro_of(start) {
            if let Some(def) = self.classes.get(&class_name) {
                if let Some(body) = def.methods.get(selector) {
                    return Some(body.clone());
                }
            }
        }
        None
    }

    /// The first built-in class on the resolution order; decides the
    /// carrier a fresh instance gets.
    pub(crate) fn builtin_root(&self, name: &str) -> Result<String, RuntimeError> {
        if !self.classes.contains_key(name) {
            return Err(RuntimeError::internal(format!("unknown class {}", name)));
        }
        for class_name in self.mro_of(name) {
            if let Some(def) = self.classes.get(&class_name) {
                if def.builtin {
                    return Ok(class_name);
                }
            }
        }
        Err(RuntimeError::internal(format!(
            "class {} does not reach a built-in root",
            name
        )))
    }

    /// Whether the two classes are related by ancestry in either direction.
    pub(crate) fn classes_related(&self, a: &str, b: &str) -> bool {
        self.mro_of(a).iter().any(|name| name == b) || self.mro_of(b).iter().any(|name| name == a)
    }
}
