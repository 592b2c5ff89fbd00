//! Expression trees for synthesized bodies
//!
//! The transformer only ever builds a fixed shape: an outer bridge call whose
//! first argument is a suspend closure calling the original declaration.
//! Builders always produce fresh nodes; no node is shared between two
//! declarations.

use crate::decl::{FunctionId, PropertyId};
use crate::ty::TypeId;

/// Target of an explicit `return`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTarget {
    /// Return from a named function
    Function(FunctionId),
    /// Return from the enclosing lambda
    Lambda,
    /// Return from a property getter
    Accessor(PropertyId),
}

/// A zero-argument closure
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub is_suspend: bool,
    pub return_type: TypeId,
    pub body: Body,
}

/// A call with explicit receiver binding
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: FunctionId,
    pub dispatch_receiver: Option<Expr>,
    pub extension_receiver: Option<Expr>,
    pub args: Vec<Expr>,
    /// Resolved result type of the call
    pub ty: TypeId,
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `this`, typed as the enclosing receiver
    This { ty: TypeId },
    /// Reference to the enclosing callable's value parameter by position
    ParamRef { index: usize, ty: TypeId },
    Lambda(Box<Lambda>),
    Call(Box<Call>),
    /// Non-throwing cast: `value as? target`, evaluating to null on failure
    SafeCast { value: Box<Expr>, target: TypeId },
    Return {
        target: ReturnTarget,
        value: Box<Expr>,
    },
}

/// A block of statements forming a callable body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub statements: Vec<Expr>,
    /// True while the body is the shape-phase stub awaiting the late pass
    pub placeholder: bool,
}

impl Body {
    pub fn new(statements: Vec<Expr>) -> Self {
        Self {
            statements,
            placeholder: false,
        }
    }

    /// The shape-phase stub installed before symbols are fully resolved
    pub fn placeholder() -> Self {
        Self {
            statements: Vec::new(),
            placeholder: true,
        }
    }
}
