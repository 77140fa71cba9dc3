pub mod env;
pub mod types;

use std::collections::HashMap;

use crate::diagnostics::GenError;
use crate::parser::ast::*;
use crate::span::{Span, Spanned};
use env::{
    AccessKind, Binding, MemberInfo, MemberKind, ParamSig, ResolvedAccess, ResolvedCall,
    SemanticModel, TypeId, TypeInfo, TypeTable,
};
use types::{SemType, TypeKey};

/// Build the semantic model for a program: register every declared type,
/// resolve member signatures, then bind method bodies.
///
/// Binding is deliberately lenient. Unresolved names type as `Unknown` and
/// produce no error here; only the classifier decides whether an unresolved
/// shape matters. The one hard error is a duplicate type definition, which
/// would make every downstream lookup ambiguous.
pub fn bind(program: &Program) -> Result<SemanticModel, GenError> {
    let mut model = SemanticModel::default();

    // Pass 0: register type shells
    for decl in &program.types {
        let t = &decl.node;
        let key = TypeKey::new(t.full_name(), t.generic_params.len());
        let info = TypeInfo {
            key,
            kind: t.kind,
            is_sealed: t.is_sealed,
            is_abstract: t.is_abstract,
            is_static: t.is_static,
            generic_params: t.generic_params.iter().map(|p| p.node.clone()).collect(),
            members: Vec::new(),
            span: t.name.span,
        };
        if model.table.insert(info).is_err() {
            return Err(GenError::syntax(
                format!("duplicate type definition '{}'", t.full_name()),
                t.name.span,
            ));
        }
    }

    // Pass 1: resolve member signatures
    for decl in &program.types {
        let t = &decl.node;
        let key = TypeKey::new(t.full_name(), t.generic_params.len());
        let id = model.table.by_key(&key).expect("registered in pass 0");
        let ns = t.namespace.as_deref();
        let type_params: Vec<String> = t.generic_params.iter().map(|p| p.node.clone()).collect();

        let mut members = Vec::new();
        for m in &t.members {
            match &m.node {
                Member::Method(md) => {
                    let mut scope = type_params.clone();
                    scope.extend(md.generic_params.iter().map(|p| p.node.clone()));
                    let params = md
                        .params
                        .iter()
                        .map(|p| ParamSig {
                            name: p.name.node.clone(),
                            mode: p.mode,
                            ty: resolve_type(&model.table, &p.ty.node, &scope, ns),
                        })
                        .collect();
                    let ret = resolve_type(&model.table, &md.return_type.node, &scope, ns);
                    members.push(MemberInfo {
                        name: md.name.node.clone(),
                        kind: MemberKind::Method {
                            generic_params: md.generic_params.iter().map(|p| p.node.clone()).collect(),
                            params,
                            ret,
                        },
                        is_static: md.modifiers.is_static,
                        is_virtual: md.modifiers.is_virtual,
                        is_abstract: md.modifiers.is_abstract || t.kind == TypeKind::Interface,
                        matcher_type: matcher_attribute(&md.attributes),
                        span: md.name.span,
                    });
                }
                Member::Property(pd) => {
                    let ty = resolve_type(&model.table, &pd.ty.node, &type_params, ns);
                    members.push(MemberInfo {
                        name: pd.name.node.clone(),
                        kind: MemberKind::Property {
                            ty,
                            has_getter: pd.has_getter,
                            has_setter: pd.has_setter,
                        },
                        is_static: pd.modifiers.is_static,
                        is_virtual: pd.modifiers.is_virtual,
                        is_abstract: pd.modifiers.is_abstract || t.kind == TypeKind::Interface,
                        matcher_type: matcher_attribute(&pd.attributes),
                        span: pd.name.span,
                    });
                }
                Member::Field(fd) => {
                    let ty = resolve_type(&model.table, &fd.ty.node, &type_params, ns);
                    members.push(MemberInfo {
                        name: fd.name.node.clone(),
                        kind: MemberKind::Field { ty },
                        is_static: fd.modifiers.is_static,
                        is_virtual: false,
                        is_abstract: t.kind == TypeKind::Interface,
                        matcher_type: None,
                        span: fd.name.span,
                    });
                }
            }
        }
        model.table.get_mut(id).members = members;
    }

    // Pass 2: bind method bodies
    for decl in &program.types {
        let t = &decl.node;
        let key = TypeKey::new(t.full_name(), t.generic_params.len());
        let id = model.table.by_key(&key).expect("registered in pass 0");
        for m in &t.members {
            if let Member::Method(md) = &m.node {
                if let Some(body) = &md.body {
                    let mut binder = BodyBinder::new(&mut model, id, t.namespace.clone());
                    binder.bind_method(md, body);
                }
            }
        }
    }

    Ok(model)
}

fn matcher_attribute(attributes: &[Spanned<Attribute>]) -> Option<String> {
    attributes
        .iter()
        .find(|a| a.node.name.node == "Matcher")
        .and_then(|a| a.node.args.first())
        .map(|arg| arg.node.clone())
}

/// Resolve a syntactic type reference against the table. Unresolvable names
/// become `Unknown`, never an error.
pub fn resolve_type(
    table: &TypeTable,
    ty: &TypeRef,
    type_params: &[String],
    namespace: Option<&str>,
) -> SemType {
    match ty {
        TypeRef::Void => SemType::Void,
        TypeRef::Named { path, args } => {
            if path.len() == 1 && args.is_empty() {
                if let Some(prim) = SemType::from_primitive_name(&path[0]) {
                    return prim;
                }
                if type_params.iter().any(|p| p == &path[0]) {
                    return SemType::Param(path[0].clone());
                }
            }
            let resolved_args: Vec<SemType> = args
                .iter()
                .map(|a| resolve_type(table, &a.node, type_params, namespace))
                .collect();
            match table.lookup(path, args.len(), namespace) {
                Some(id) => SemType::Named { key: table.get(id).key.clone(), args: resolved_args },
                None => SemType::Unknown,
            }
        }
    }
}

struct Scope {
    depth: usize,
    vars: Vec<(String, SemType, bool)>,
}

struct BodyBinder<'a> {
    model: &'a mut SemanticModel,
    current_type: TypeId,
    namespace: Option<String>,
    type_params: Vec<String>,
    scopes: Vec<Scope>,
    lambda_depth: usize,
}

impl<'a> BodyBinder<'a> {
    fn new(model: &'a mut SemanticModel, current_type: TypeId, namespace: Option<String>) -> Self {
        let type_params = model.table.get(current_type).generic_params.clone();
        Self { model, current_type, namespace, type_params, scopes: Vec::new(), lambda_depth: 0 }
    }

    fn bind_method(&mut self, method: &MethodDecl, body: &Spanned<Block>) {
        let mut scope = Scope { depth: 0, vars: Vec::new() };
        let mut params_in_scope = self.type_params.clone();
        params_in_scope.extend(method.generic_params.iter().map(|p| p.node.clone()));
        self.type_params = params_in_scope;
        for p in &method.params {
            let ty = resolve_type(&self.model.table, &p.ty.node, &self.type_params, self.namespace.as_deref());
            scope.vars.push((p.name.node.clone(), ty, true));
        }
        self.scopes.push(scope);
        self.bind_block(body);
        self.scopes.pop();
    }

    fn bind_block(&mut self, block: &Spanned<Block>) {
        for stmt in &block.node.stmts {
            self.bind_stmt(stmt);
        }
    }

    fn bind_stmt(&mut self, stmt: &Spanned<Stmt>) {
        match &stmt.node {
            Stmt::Var { name, value } => {
                let ty = self.bind_expr(value, None);
                self.scopes
                    .last_mut()
                    .expect("statement outside scope")
                    .vars
                    .push((name.node.clone(), ty, false));
            }
            Stmt::Return(Some(value)) => {
                self.bind_expr(value, None);
            }
            Stmt::Return(None) => {}
            Stmt::Expr(e) => {
                self.bind_expr(e, None);
            }
        }
    }

    fn record(&mut self, span: Span, ty: SemType) -> SemType {
        self.model.expr_types.insert(span, ty.clone());
        ty
    }

    fn scope_lookup(&self, name: &str) -> Option<Binding> {
        for scope in self.scopes.iter().rev() {
            for (var, ty, is_param) in scope.vars.iter().rev() {
                if var == name {
                    return Some(if *is_param {
                        Binding::Param { ty: ty.clone(), depth: scope.depth }
                    } else {
                        Binding::Local { ty: ty.clone(), depth: scope.depth }
                    });
                }
            }
        }
        None
    }

    fn lookup_ident(&self, name: &str) -> Binding {
        if let Some(binding) = self.scope_lookup(name) {
            return binding;
        }
        // Instance member shorthand on the enclosing type.
        let info = self.model.table.get(self.current_type);
        for member in &info.members {
            if member.name == name {
                let ty = match &member.kind {
                    MemberKind::Field { ty } => ty.clone(),
                    MemberKind::Property { ty, .. } => ty.clone(),
                    MemberKind::Method { .. } => continue,
                };
                return Binding::Field { declaring: info.key.clone(), ty };
            }
        }
        if let Some(id) = self.model.table.lookup(
            std::slice::from_ref(&name.to_string()),
            0,
            self.namespace.as_deref(),
        ) {
            return Binding::StaticType { id };
        }
        Binding::Unknown
    }

    /// A pure `a.b.c` identifier chain, if the expression is one.
    fn dotted_path(expr: &Spanned<Expr>) -> Option<Vec<String>> {
        match &expr.node {
            Expr::Ident(name) => Some(vec![name.clone()]),
            Expr::Member { object, name } => {
                let mut path = Self::dotted_path(object)?;
                path.push(name.node.clone());
                Some(path)
            }
            _ => None,
        }
    }

    /// Resolve an invocation receiver to either a static type or an instance
    /// type. Locals shadow type names, so scope lookup wins over a dotted
    /// path that happens to spell a type.
    fn resolve_receiver(&mut self, object: &Spanned<Expr>) -> Receiver {
        if let Some(path) = Self::dotted_path(object) {
            let shadowed = self.scope_lookup(&path[0]).is_some();
            if !shadowed {
                if let Some(id) = self.model.table.lookup(&path, 0, self.namespace.as_deref()) {
                    self.model.bindings.insert(object.span, Binding::StaticType { id });
                    self.record(object.span, SemType::Unknown);
                    return Receiver::Static(id);
                }
            }
        }
        let ty = self.bind_expr(object, None);
        match ty {
            SemType::Named { key, args } => match self.model.table.by_key(&key) {
                Some(id) => Receiver::Instance(id, args),
                None => Receiver::Opaque,
            },
            _ => Receiver::Opaque,
        }
    }

    fn bind_expr(&mut self, expr: &Spanned<Expr>, expected: Option<&SemType>) -> SemType {
        let span = expr.span;
        match &expr.node {
            Expr::Int(_) => self.record(span, SemType::Int),
            Expr::Long(_) => self.record(span, SemType::Long),
            Expr::Float(_) => self.record(span, SemType::Float),
            Expr::Double(_) => self.record(span, SemType::Double),
            Expr::Decimal(_) => self.record(span, SemType::Decimal),
            Expr::Str(_) => self.record(span, SemType::Str),
            Expr::Char(_) => self.record(span, SemType::Char),
            Expr::Bool(_) => self.record(span, SemType::Bool),
            Expr::Null => self.record(span, SemType::Null),
            Expr::This => {
                let info = self.model.table.get(self.current_type);
                let args = info.generic_params.iter().map(|p| SemType::Param(p.clone())).collect();
                let ty = SemType::Named { key: info.key.clone(), args };
                self.record(span, ty)
            }
            Expr::Ident(name) => {
                let binding = self.lookup_ident(name);
                let ty = match &binding {
                    Binding::Local { ty, .. } | Binding::Param { ty, .. } => ty.clone(),
                    Binding::Field { ty, .. } => ty.clone(),
                    Binding::StaticType { .. } | Binding::Unknown => SemType::Unknown,
                };
                self.model.bindings.insert(span, binding);
                self.record(span, ty)
            }
            Expr::Member { object, name } => {
                let receiver = self.resolve_receiver(object);
                let ty = self.resolve_access(span, &receiver, &name.node);
                self.record(span, ty)
            }
            Expr::Invoke { callee, generic_args, args } => {
                let ty = self.bind_invoke(span, callee, generic_args, args);
                self.record(span, ty)
            }
            Expr::New { ty, args } => {
                let resolved =
                    resolve_type(&self.model.table, &ty.node, &self.type_params, self.namespace.as_deref());
                for arg in args {
                    self.bind_expr(arg, None);
                }
                self.record(span, resolved)
            }
            Expr::Lambda { params, body } => {
                let depth = self.lambda_depth + 1;
                self.model.lambda_depths.insert(span, depth);
                let signature = expected.and_then(delegate_signature);
                let mut scope = Scope { depth, vars: Vec::new() };
                for (i, p) in params.iter().enumerate() {
                    let ty = signature
                        .as_ref()
                        .and_then(|(param_tys, _)| param_tys.get(i).cloned())
                        .unwrap_or(SemType::Unknown);
                    scope.vars.push((p.node.clone(), ty, true));
                }
                self.scopes.push(scope);
                let outer_depth = self.lambda_depth;
                self.lambda_depth = depth;
                match body {
                    LambdaBody::Expr(e) => {
                        self.bind_expr(e, None);
                    }
                    LambdaBody::Block(b) => self.bind_block(b),
                }
                self.lambda_depth = outer_depth;
                self.scopes.pop();
                let ty = expected.cloned().unwrap_or(SemType::Unknown);
                self.record(span, ty)
            }
            Expr::Assign { target, value } => {
                let target_ty = self.bind_expr(target, None);
                self.bind_expr(value, Some(&target_ty));
                self.record(span, target_ty)
            }
            Expr::Unary { op, operand } => {
                let operand_ty = self.bind_expr(operand, None);
                let ty = match op {
                    UnaryOp::Not => SemType::Bool,
                    UnaryOp::Neg => operand_ty,
                };
                self.record(span, ty)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs_ty = self.bind_expr(lhs, None);
                self.bind_expr(rhs, None);
                let ty = match op {
                    BinaryOp::Eq
                    | BinaryOp::Ne
                    | BinaryOp::Lt
                    | BinaryOp::Le
                    | BinaryOp::Gt
                    | BinaryOp::Ge
                    | BinaryOp::And
                    | BinaryOp::Or => SemType::Bool,
                    _ => lhs_ty,
                };
                self.record(span, ty)
            }
        }
    }

    fn resolve_access(&mut self, span: Span, receiver: &Receiver, name: &str) -> SemType {
        let (id, receiver_args) = match receiver {
            Receiver::Static(id) => (*id, Vec::new()),
            Receiver::Instance(id, args) => (*id, args.clone()),
            Receiver::Opaque => return SemType::Unknown,
        };
        let info = self.model.table.get(id);
        let Some(index) = info.members.iter().position(|m| m.name == name) else {
            return SemType::Unknown;
        };
        let member = &info.members[index];
        let subst: HashMap<String, SemType> =
            info.generic_params.iter().cloned().zip(receiver_args).collect();
        match &member.kind {
            MemberKind::Property { ty, .. } => {
                let ty = ty.substitute(&subst);
                self.model.accesses.insert(
                    span,
                    ResolvedAccess {
                        declaring: info.key.clone(),
                        declaring_id: id,
                        member: name.to_string(),
                        member_index: index,
                        ty: ty.clone(),
                        kind: AccessKind::Property,
                    },
                );
                ty
            }
            MemberKind::Field { ty } => {
                let ty = ty.substitute(&subst);
                self.model.accesses.insert(
                    span,
                    ResolvedAccess {
                        declaring: info.key.clone(),
                        declaring_id: id,
                        member: name.to_string(),
                        member_index: index,
                        ty: ty.clone(),
                        kind: AccessKind::Field,
                    },
                );
                ty
            }
            // A bare method group has no value type here.
            MemberKind::Method { .. } => SemType::Unknown,
        }
    }

    fn bind_invoke(
        &mut self,
        span: Span,
        callee: &Spanned<Expr>,
        generic_args: &[Spanned<TypeRef>],
        args: &[Spanned<Expr>],
    ) -> SemType {
        let Expr::Member { object, name } = &callee.node else {
            // Bare-identifier and computed callees are not framework shapes;
            // bind the arguments and move on.
            for arg in args {
                self.bind_expr(arg, None);
            }
            return SemType::Unknown;
        };

        let receiver = self.resolve_receiver(object);
        let (id, receiver_args, is_static_receiver) = match &receiver {
            Receiver::Static(id) => (*id, Vec::new(), true),
            Receiver::Instance(id, targs) => (*id, targs.clone(), false),
            Receiver::Opaque => {
                for arg in args {
                    self.bind_expr(arg, None);
                }
                return SemType::Unknown;
            }
        };

        let info = self.model.table.get(id);
        let found = info.members.iter().enumerate().find(|(_, m)| {
            m.name == name.node && matches!(m.kind, MemberKind::Method { .. })
        });
        let Some((index, member)) = found else {
            for arg in args {
                self.bind_expr(arg, None);
            }
            return SemType::Unknown;
        };
        let MemberKind::Method { generic_params, params, ret } = member.kind.clone() else {
            unreachable!("filtered to methods above");
        };
        let declaring = info.key.clone();
        let is_static = member.is_static;
        let type_generic_params = info.generic_params.clone();

        let resolved_type_args: Vec<SemType> = generic_args
            .iter()
            .map(|a| resolve_type(&self.model.table, &a.node, &self.type_params, self.namespace.as_deref()))
            .collect();

        let mut subst: HashMap<String, SemType> = type_generic_params
            .iter()
            .cloned()
            .zip(receiver_args.iter().cloned())
            .collect();
        if generic_params.len() == resolved_type_args.len() {
            subst.extend(generic_params.iter().cloned().zip(resolved_type_args.iter().cloned()));
        }

        let param_tys: Vec<SemType> = params.iter().map(|p| p.ty.substitute(&subst)).collect();
        for (i, arg) in args.iter().enumerate() {
            let expected = param_tys.get(i);
            self.bind_expr(arg, expected);
        }

        let ret = ret.substitute(&subst);
        self.model.calls.insert(
            span,
            ResolvedCall {
                declaring,
                declaring_id: id,
                member: name.node.clone(),
                member_index: index,
                is_static: is_static || is_static_receiver,
                type_args: resolved_type_args,
                receiver_args,
                params: param_tys,
                ret: ret.clone(),
            },
        );
        ret
    }
}

enum Receiver {
    Static(TypeId),
    Instance(TypeId, Vec<SemType>),
    Opaque,
}

/// Decompose a delegate type into parameter and return types. `Action<...>`
/// takes all its arguments as parameters and returns void; `Func<...>`
/// returns its last argument.
fn delegate_signature(ty: &SemType) -> Option<(Vec<SemType>, SemType)> {
    let SemType::Named { key, args } = ty else { return None };
    match key.short_name() {
        "Action" => Some((args.clone(), SemType::Void)),
        "Func" if !args.is_empty() => {
            let (ret, params) = args.split_last().expect("non-empty checked");
            Some((params.to_vec(), ret.clone()))
        }
        _ => None,
    }
}
