//! Ingestion of the AST document: the event stream is folded into a small
//! navigable element tree, which is then lowered to the node types the
//! evaluator walks. The document is produced by an already-validating
//! front end, so every structural surprise here is an internal error.

use std::collections::HashMap;
use std::rc::Rc;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::ast::{AssignNode, BlockNode, ClassNode, ExprNode, LiteralNode, MethodNode, Program};
use crate::value::RuntimeError;

#[derive(Debug)]
pub struct XmlNode {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attrs: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn required_attr(&self, name: &str) -> Result<&str, RuntimeError> {
        self.attr(name).ok_or_else(|| {
            RuntimeError::internal(format!("<{}> is missing the '{}' attribute", self.tag, name))
        })
    }

    fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.tag == tag)
    }
}

/// Parses the document and returns its root element.
pub fn parse_document(source: &str) -> Result<XmlNode, RuntimeError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text_start = true;
    reader.config_mut().trim_text_end = true;

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| RuntimeError::internal(format!("malformed document: {}", err)))?;
        match event {
            Event::Start(start) => {
                let node = element_from_start(&start)?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = element_from_start(&start)?;
                attach(node, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| RuntimeError::internal("unbalanced closing tag"))?;
                attach(node, &mut stack, &mut root)?;
            }
            Event::Eof => break,
            // Declarations, comments and inter-element whitespace carry
            // nothing the tree needs.
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(RuntimeError::internal("document ended inside an element"));
    }
    root.ok_or_else(|| RuntimeError::internal("document has no root element"))
}

fn element_from_start(start: &quick_xml::events::BytesStart<'_>) -> Result<XmlNode, RuntimeError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = XmlNode::new(tag);
    for attr in start.attributes() {
        let attr =
            attr.map_err(|err| RuntimeError::internal(format!("malformed attribute: {}", err)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        // The description attribute may carry entities outside the XML
        // predefined set; fall back to the raw bytes rather than reject.
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        node.attrs.insert(key, value);
    }
    Ok(node)
}

fn attach(
    node: XmlNode,
    stack: &mut Vec<XmlNode>,
    root: &mut Option<XmlNode>,
) -> Result<(), RuntimeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_some() {
                return Err(RuntimeError::internal("document has two root elements"));
            }
            *root = Some(node);
        }
    }
    Ok(())
}

/// Lowers the element tree to the program AST.
pub fn build_program(root: &XmlNode) -> Result<Program, RuntimeError> {
    if root.tag != "program" {
        return Err(RuntimeError::internal(format!(
            "expected <program> root, found <{}>",
            root.tag
        )));
    }
    if root.attr("language") != Some("SOL25") {
        return Err(RuntimeError::internal("root element is not a SOL25 program"));
    }
    let mut classes = Vec::new();
    for child in &root.children {
        if child.tag != "class" {
            return Err(RuntimeError::internal(format!(
                "unexpected <{}> under <program>",
                child.tag
            )));
        }
        classes.push(build_class(child)?);
    }
    Ok(Program { classes })
}

fn build_class(node: &XmlNode) -> Result<ClassNode, RuntimeError> {
    let name = node.required_attr("name")?.to_string();
    let parent = node.required_attr("parent")?.to_string();
    let mut methods = Vec::new();
    for child in &node.children {
        if child.tag != "method" {
            return Err(RuntimeError::internal(format!(
                "unexpected <{}> in class {}",
                child.tag, name
            )));
        }
        let selector = child.required_attr("selector")?.to_string();
        let body = match child.children.as_slice() {
            [block] if block.tag == "block" => build_block(block)?,
            _ => {
                return Err(RuntimeError::internal(format!(
                    "method {} of class {} must hold exactly one block",
                    selector, name
                )))
            }
        };
        methods.push(MethodNode {
            selector,
            body: Rc::new(body),
        });
    }
    Ok(ClassNode {
        name,
        parent,
        methods,
    })
}

fn build_block(node: &XmlNode) -> Result<BlockNode, RuntimeError> {
    let arity: usize = node
        .required_attr("arity")?
        .parse()
        .map_err(|_| RuntimeError::internal("block arity is not a number"))?;

    let mut parameters = Vec::new();
    for param in node.children_tagged("parameter") {
        let order = parse_order(param)?;
        let name = param.required_attr("name")?.to_string();
        parameters.push((order, name));
    }
    let parameters = sort_by_order(parameters, "parameter")?;
    if parameters.len() != arity {
        return Err(RuntimeError::internal(
            "block arity disagrees with its parameter count",
        ));
    }

    let mut assigns = Vec::new();
    for assign in node.children_tagged("assign") {
        let order = parse_order(assign)?;
        assigns.push((order, build_assign(assign)?));
    }
    let assigns = sort_by_order(assigns, "assign")?;

    for child in &node.children {
        if child.tag != "parameter" && child.tag != "assign" {
            return Err(RuntimeError::internal(format!(
                "unexpected <{}> in a block",
                child.tag
            )));
        }
    }

    Ok(BlockNode {
        parameters,
        assigns,
    })
}

fn build_assign(node: &XmlNode) -> Result<AssignNode, RuntimeError> {
    let mut var = None;
    let mut expr = None;
    for child in &node.children {
        match child.tag.as_str() {
            "var" if var.is_none() => var = Some(child.required_attr("name")?.to_string()),
            "expr" if expr.is_none() => expr = Some(build_expr(child)?),
            other => {
                return Err(RuntimeError::internal(format!(
                    "unexpected <{}> in an assignment",
                    other
                )))
            }
        }
    }
    match (var, expr) {
        (Some(var), Some(expr)) => Ok(AssignNode { var, expr }),
        _ => Err(RuntimeError::internal(
            "assignment must hold one var and one expr",
        )),
    }
}

fn build_expr(node: &XmlNode) -> Result<ExprNode, RuntimeError> {
    let child = match node.children.as_slice() {
        [child] => child,
        _ => {
            return Err(RuntimeError::internal(
                "expr must hold exactly one element",
            ))
        }
    };
    match child.tag.as_str() {
        "literal" => build_literal(child).map(ExprNode::Literal),
        "var" => Ok(ExprNode::Var(child.required_attr("name")?.to_string())),
        "block" => Ok(ExprNode::Block(Rc::new(build_block(child)?))),
        "send" => build_send(child),
        other => Err(RuntimeError::internal(format!(
            "unexpected <{}> inside expr",
            other
        ))),
    }
}

fn build_literal(node: &XmlNode) -> Result<LiteralNode, RuntimeError> {
    match node.required_attr("class")? {
        "Nil" => Ok(LiteralNode::Nil),
        "True" => Ok(LiteralNode::True),
        "False" => Ok(LiteralNode::False),
        "Integer" => node
            .required_attr("value")?
            .parse()
            .map(LiteralNode::Integer)
            .map_err(|_| RuntimeError::internal("integer literal is not a valid number")),
        "String" => Ok(LiteralNode::Str(node.required_attr("value")?.to_string())),
        "class" => Ok(LiteralNode::Class(
            node.required_attr("value")?.to_string(),
        )),
        other => Err(RuntimeError::internal(format!(
            "unknown literal class '{}'",
            other
        ))),
    }
}

fn build_send(node: &XmlNode) -> Result<ExprNode, RuntimeError> {
    let selector = node.required_attr("selector")?.to_string();
    let receiver = match node.children.first() {
        Some(first) if first.tag == "expr" => build_expr(first)?,
        _ => {
            return Err(RuntimeError::internal(format!(
                "send '{}' is missing its receiver expr",
                selector
            )))
        }
    };
    let mut args = Vec::new();
    for arg in node.children.iter().skip(1) {
        if arg.tag != "arg" {
            return Err(RuntimeError::internal(format!(
                "unexpected <{}> in send '{}'",
                arg.tag, selector
            )));
        }
        let order = parse_order(arg)?;
        let expr = match arg.children.as_slice() {
            [child] if child.tag == "expr" => build_expr(child)?,
            _ => {
                return Err(RuntimeError::internal(
                    "arg must hold exactly one expr",
                ))
            }
        };
        args.push((order, expr));
    }
    let args = sort_by_order(args, "arg")?;
    Ok(ExprNode::Send {
        selector,
        receiver: Box::new(receiver),
        args,
    })
}

fn parse_order(node: &XmlNode) -> Result<u32, RuntimeError> {
    let order: u32 = node
        .required_attr("order")?
        .parse()
        .map_err(|_| RuntimeError::internal("order is not a number"))?;
    if order == 0 {
        return Err(RuntimeError::internal("order must be positive"));
    }
    Ok(order)
}

fn sort_by_order<T>(mut items: Vec<(u32, T)>, what: &str) -> Result<Vec<T>, RuntimeError> {
    items.sort_by_key(|(order, _)| *order);
    for window in items.windows(2) {
        if window[0].0 == window[1].0 {
            return Err(RuntimeError::internal(format!(
                "duplicate {} order {}",
                what, window[0].0
            )));
        }
    }
    Ok(items.into_iter().map(|(_, item)| item).collect())
}
