use std::collections::HashMap;

use crate::parser::ast::{ParamMode, TypeKind};
use crate::span::Span;
use super::types::{SemType, TypeKey};

pub type TypeId = usize;

#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub key: TypeKey,
    pub kind: TypeKind,
    pub is_sealed: bool,
    pub is_abstract: bool,
    pub is_static: bool,
    pub generic_params: Vec<String>,
    pub members: Vec<MemberInfo>,
    /// Span of the declaration's name token.
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    /// Fully-qualified matcher type from a `[Matcher(...)]` attribute, if the
    /// member is a matcher factory.
    pub matcher_type: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MemberKind {
    Method {
        generic_params: Vec<String>,
        params: Vec<ParamSig>,
        ret: SemType,
    },
    Property {
        ty: SemType,
        has_getter: bool,
        has_setter: bool,
    },
    Field {
        ty: SemType,
    },
}

#[derive(Debug, Clone)]
pub struct ParamSig {
    pub name: String,
    pub mode: ParamMode,
    pub ty: SemType,
}

/// All declared types, looked up by key or by short name.
#[derive(Debug, Default)]
pub struct TypeTable {
    pub types: Vec<TypeInfo>,
    by_key: HashMap<TypeKey, TypeId>,
    by_short: HashMap<(String, usize), Vec<TypeId>>,
}

impl TypeTable {
    pub fn insert(&mut self, info: TypeInfo) -> Result<TypeId, TypeId> {
        if let Some(&existing) = self.by_key.get(&info.key) {
            return Err(existing);
        }
        let id = self.types.len();
        self.by_key.insert(info.key.clone(), id);
        self.by_short
            .entry((info.key.short_name().to_string(), info.key.arity))
            .or_default()
            .push(id);
        self.types.push(info);
        Ok(id)
    }

    pub fn get(&self, id: TypeId) -> &TypeInfo {
        &self.types[id]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeInfo {
        &mut self.types[id]
    }

    pub fn by_key(&self, key: &TypeKey) -> Option<TypeId> {
        self.by_key.get(key).copied()
    }

    /// Resolve a (possibly dotted) name at a given arity from a namespace
    /// context. A dotted name is tried as fully-qualified first; a single
    /// segment resolves through the current namespace, then uniquely by
    /// short name.
    pub fn lookup(&self, path: &[String], arity: usize, namespace: Option<&str>) -> Option<TypeId> {
        let dotted = path.join(".");
        if let Some(&id) = self.by_key.get(&TypeKey::new(dotted.clone(), arity)) {
            return Some(id);
        }
        if let Some(ns) = namespace {
            let qualified = TypeKey::new(format!("{ns}.{dotted}"), arity);
            if let Some(&id) = self.by_key.get(&qualified) {
                return Some(id);
            }
        }
        if path.len() == 1 {
            if let Some(ids) = self.by_short.get(&(path[0].clone(), arity)) {
                if ids.len() == 1 {
                    return Some(ids[0]);
                }
            }
        }
        None
    }

    pub fn member_index(&self, id: TypeId, name: &str) -> Option<usize> {
        self.types[id].members.iter().position(|m| m.name == name)
    }
}

/// How an identifier expression is bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A local declared with `var`. `depth` is the lambda nesting level of
    /// the declaring scope; the method body is depth 0.
    Local { ty: SemType, depth: usize },
    /// A lambda or method parameter, with the declaring scope's depth.
    Param { ty: SemType, depth: usize },
    /// A field of the enclosing type.
    Field { declaring: TypeKey, ty: SemType },
    /// The identifier names a type (static member access follows).
    StaticType { id: TypeId },
    Unknown,
}

/// A resolved invocation target with its instantiated signature.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    pub declaring: TypeKey,
    pub declaring_id: TypeId,
    pub member: String,
    pub member_index: usize,
    pub is_static: bool,
    /// Explicit method type arguments, resolved.
    pub type_args: Vec<SemType>,
    /// The receiver type's instantiated arguments.
    pub receiver_args: Vec<SemType>,
    pub params: Vec<SemType>,
    pub ret: SemType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Property,
    Field,
}

/// A resolved non-invocation member access (property or field use).
#[derive(Debug, Clone)]
pub struct ResolvedAccess {
    pub declaring: TypeKey,
    pub declaring_id: TypeId,
    pub member: String,
    pub member_index: usize,
    pub ty: SemType,
    pub kind: AccessKind,
}

/// Facts the binder records about a program, keyed by expression span.
/// Spans are unique per node, which makes them a serviceable node identity.
#[derive(Debug, Default)]
pub struct SemanticModel {
    pub table: TypeTable,
    pub expr_types: HashMap<Span, SemType>,
    pub bindings: HashMap<Span, Binding>,
    pub calls: HashMap<Span, ResolvedCall>,
    pub accesses: HashMap<Span, ResolvedAccess>,
    /// Lambda expression span -> nesting depth (method body is 0, a lambda
    /// directly inside it is 1, and so on).
    pub lambda_depths: HashMap<Span, usize>,
}

impl SemanticModel {
    pub fn type_of(&self, span: Span) -> &SemType {
        self.expr_types.get(&span).unwrap_or(&SemType::Unknown)
    }

    pub fn binding_of(&self, span: Span) -> &Binding {
        self.bindings.get(&span).unwrap_or(&Binding::Unknown)
    }
}
