//! Runtime values.
//!
//! Functions and classes are ordinary values next to integers and
//! strings, so whether something can be called is decided at runtime.

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;
use sunset_warnings::SourceLocation;

use crate::error::CallError;

/// Native function body: positional arguments in, value out.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value>>;

/// Runtime values
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Unit,
    List(Vec<Value>),
    Function(Function),
    Class(Class),
    Instance(Instance),
}

impl Value {
    /// Name of the value's type; instances report their class.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Unit => "unit",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(inst) => &inst.class,
        }
    }

    /// Call a function or construct an instance of a class.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Value::Function(func) => func.call(args),
            Value::Class(class) => class.construct(args),
            other => Err(CallError::NotCallable(other.type_name().to_string()).into()),
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Class(_))
    }
}

impl PartialEq for Value {
    /// Data compares by value; functions by identity of their body.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.body, &b.body),
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Unit => write!(f, "()"),
            Value::List(elems) => {
                write!(f, "[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Class(class) => write!(f, "<class {}.{}>", class.module, class.name),
            Value::Instance(inst) => {
                write!(f, "{} {{ ", inst.class)?;
                let mut first = true;
                for (name, value) in &inst.fields {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                    first = false;
                }
                write!(f, " }}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function
// ---------------------------------------------------------------------------

/// A named native function with its definition site.
#[derive(Clone)]
pub struct Function {
    name: String,
    location: SourceLocation,
    doc: Option<String>,
    body: NativeFn,
    wrapped: Option<Box<Value>>,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("wraps", &self.wrapped.is_some())
            .finish()
    }
}

impl Function {
    /// Define a function; its definition site is the caller's location.
    #[track_caller]
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self::at(name, SourceLocation::caller(), body)
    }

    /// Define a function at an explicit location.
    pub fn at(
        name: impl Into<String>,
        location: SourceLocation,
        body: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            doc: None,
            body: Rc::new(body),
            wrapped: None,
        }
    }

    /// A replacement for `original` that keeps its name, location and doc
    /// and remembers it as [`Function::wrapped`].
    pub fn wrapping(
        original: &Function,
        body: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        let mut func = Self::at(original.name.clone(), original.location.clone(), body);
        func.doc = original.doc.clone();
        func.wrapped = Some(Box::new(Value::Function(original.clone())));
        func
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub(crate) fn with_wrapped(mut self, original: Value) -> Self {
        self.wrapped = Some(Box::new(original));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File and line the function was defined at.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The value this function replaces, if it was built as a wrapper.
    pub fn wrapped(&self) -> Option<&Value> {
        self.wrapped.as_deref()
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.body)(args)
    }
}

// ---------------------------------------------------------------------------
// Class / Instance
// ---------------------------------------------------------------------------

/// A record-like class: calling it binds one positional argument per field.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    /// Declaring module, e.g. `billing::legacy`.
    pub module: String,
    pub doc: Option<String>,
    pub fields: Vec<String>,
}

impl Class {
    pub fn new<I, S>(name: impl Into<String>, module: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            module: module.into(),
            doc: None,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Build an instance from positional arguments.
    pub fn construct(&self, args: &[Value]) -> Result<Value> {
        if args.len() != self.fields.len() {
            return Err(CallError::Arity {
                name: self.name.clone(),
                expected: self.fields.len(),
                got: args.len(),
            }
            .into());
        }
        let fields = self
            .fields
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        Ok(Value::Instance(Instance {
            class: self.name.clone(),
            module: self.module.clone(),
            fields,
        }))
    }
}

/// An instance of a [`Class`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: String,
    pub module: String,
    pub fields: BTreeMap<String, Value>,
}

impl Instance {
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class == class.name && self.module == class.module
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
