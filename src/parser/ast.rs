use crate::span::Spanned;

/// A parsed program. Files are parsed independently and merged; namespaces
/// are flattened at parse time, so every type carries its namespace name.
#[derive(Debug, Default)]
pub struct Program {
    pub usings: Vec<Spanned<UsingDirective>>,
    pub types: Vec<Spanned<TypeDecl>>,
}

#[derive(Debug, Clone)]
pub struct UsingDirective {
    pub path: Vec<Spanned<String>>,
}

impl UsingDirective {
    pub fn full_path(&self) -> String {
        self.path.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Interface,
    Class,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub kind: TypeKind,
    pub namespace: Option<String>,
    pub name: Spanned<String>,
    pub generic_params: Vec<Spanned<String>>,
    pub is_sealed: bool,
    pub is_abstract: bool,
    pub is_static: bool,
    pub bases: Vec<Spanned<TypeRef>>,
    pub members: Vec<Spanned<Member>>,
}

impl TypeDecl {
    /// Fully-qualified name, e.g. `Tests.IFoo`.
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name.node),
            None => self.name.node.clone(),
        }
    }
}

/// `[Name]` or `[Name(TypeArg, ...)]`. Attribute arguments are restricted to
/// type names, which is all the framework's own attributes take.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: Spanned<String>,
    pub args: Vec<Spanned<String>>,
}

#[derive(Debug, Clone)]
pub enum Member {
    Method(MethodDecl),
    Property(PropertyDecl),
    Field(FieldDecl),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemberModifiers {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    pub is_readonly: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: MemberModifiers,
    pub return_type: Spanned<TypeRef>,
    pub name: Spanned<String>,
    pub generic_params: Vec<Spanned<String>>,
    pub params: Vec<Param>,
    pub body: Option<Spanned<Block>>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub mode: ParamMode,
    pub ty: Spanned<TypeRef>,
    pub name: Spanned<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    Value,
    Ref,
    Out,
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: MemberModifiers,
    pub ty: Spanned<TypeRef>,
    pub name: Spanned<String>,
    pub has_getter: bool,
    pub has_setter: bool,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub attributes: Vec<Spanned<Attribute>>,
    pub modifiers: MemberModifiers,
    pub ty: Spanned<TypeRef>,
    pub name: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Void,
    Named {
        /// Dotted path segments, e.g. `["System", "Func"]` or `["IFoo"]`.
        path: Vec<String>,
        args: Vec<Spanned<TypeRef>>,
    },
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef::Named { path: name.split('.').map(String::from).collect(), args: Vec::new() }
    }

    pub fn short_name(&self) -> &str {
        match self {
            TypeRef::Void => "void",
            TypeRef::Named { path, .. } => path.last().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn path_string(&self) -> String {
        match self {
            TypeRef::Void => "void".to_string(),
            TypeRef::Named { path, .. } => path.join("."),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Named { path, args } => {
                write!(f, "{}", path.join("."))?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a.node)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Var {
        name: Spanned<String>,
        value: Spanned<Expr>,
    },
    Return(Option<Spanned<Expr>>),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(String),
    Str(String),
    Char(char),
    Bool(bool),
    Null,
    This,
    Ident(String),
    Member {
        object: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
    Invoke {
        callee: Box<Spanned<Expr>>,
        generic_args: Vec<Spanned<TypeRef>>,
        args: Vec<Spanned<Expr>>,
    },
    New {
        ty: Spanned<TypeRef>,
        args: Vec<Spanned<Expr>>,
    },
    Lambda {
        params: Vec<Spanned<String>>,
        body: LambdaBody,
    },
    Assign {
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
}

impl Expr {
    /// The span of the member-access name token of an invocation's callee.
    /// This is the position interception keys are derived from.
    pub fn invoke_name_span(callee: &Spanned<Expr>) -> crate::span::Span {
        match &callee.node {
            Expr::Member { name, .. } => name.span,
            _ => callee.span,
        }
    }

    /// The member name an invocation calls through, if its callee is a
    /// member access or a bare identifier.
    pub fn invoke_name(callee: &Spanned<Expr>) -> Option<&str> {
        match &callee.node {
            Expr::Member { name, .. } => Some(&name.node),
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Spanned<Expr>>),
    Block(Spanned<Block>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}
