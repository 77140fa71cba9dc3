//! AST visitor infrastructure.
//!
//! Implement [`Visitor`] for a pass, overriding only the methods you need, and
//! call the corresponding `walk_*` function inside your override to get
//! default recursion. Omit the walk call to prune traversal at that node.
//!
//! The trait is parameterized over the AST lifetime so passes can collect
//! references to the nodes they visit; the candidate scanner does exactly
//! that.

use crate::parser::ast::*;
use crate::span::Spanned;

/// Read-only AST visitor. Default implementations recurse into all children.
pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_type_decl(&mut self, decl: &'ast Spanned<TypeDecl>) {
        walk_type_decl(self, decl);
    }

    fn visit_member(&mut self, member: &'ast Spanned<Member>) {
        walk_member(self, member);
    }

    fn visit_block(&mut self, block: &'ast Spanned<Block>) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_type_ref(&mut self, ty: &'ast Spanned<TypeRef>) {
        walk_type_ref(self, ty);
    }
}

pub fn walk_program<'ast, V: Visitor<'ast>>(v: &mut V, program: &'ast Program) {
    for decl in &program.types {
        v.visit_type_decl(decl);
    }
}

pub fn walk_type_decl<'ast, V: Visitor<'ast>>(v: &mut V, decl: &'ast Spanned<TypeDecl>) {
    for base in &decl.node.bases {
        v.visit_type_ref(base);
    }
    for member in &decl.node.members {
        v.visit_member(member);
    }
}

pub fn walk_member<'ast, V: Visitor<'ast>>(v: &mut V, member: &'ast Spanned<Member>) {
    match &member.node {
        Member::Method(m) => {
            v.visit_type_ref(&m.return_type);
            for p in &m.params {
                v.visit_type_ref(&p.ty);
            }
            if let Some(body) = &m.body {
                v.visit_block(body);
            }
        }
        Member::Property(p) => {
            v.visit_type_ref(&p.ty);
        }
        Member::Field(f) => {
            v.visit_type_ref(&f.ty);
        }
    }
}

pub fn walk_block<'ast, V: Visitor<'ast>>(v: &mut V, block: &'ast Spanned<Block>) {
    for stmt in &block.node.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast>>(v: &mut V, stmt: &'ast Spanned<Stmt>) {
    match &stmt.node {
        Stmt::Var { value, .. } => v.visit_expr(value),
        Stmt::Return(Some(value)) => v.visit_expr(value),
        Stmt::Return(None) => {}
        Stmt::Expr(e) => v.visit_expr(e),
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(v: &mut V, expr: &'ast Spanned<Expr>) {
    match &expr.node {
        Expr::Int(_)
        | Expr::Long(_)
        | Expr::Float(_)
        | Expr::Double(_)
        | Expr::Decimal(_)
        | Expr::Str(_)
        | Expr::Char(_)
        | Expr::Bool(_)
        | Expr::Null
        | Expr::This
        | Expr::Ident(_) => {}
        Expr::Member { object, .. } => v.visit_expr(object),
        Expr::Invoke { callee, generic_args, args } => {
            v.visit_expr(callee);
            for ty in generic_args {
                v.visit_type_ref(ty);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::New { ty, args } => {
            v.visit_type_ref(ty);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Lambda { body, .. } => match body {
            LambdaBody::Expr(e) => v.visit_expr(e),
            LambdaBody::Block(b) => v.visit_block(b),
        },
        Expr::Assign { target, value } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Unary { operand, .. } => v.visit_expr(operand),
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
    }
}

pub fn walk_type_ref<'ast, V: Visitor<'ast>>(v: &mut V, ty: &'ast Spanned<TypeRef>) {
    if let TypeRef::Named { args, .. } = &ty.node {
        for arg in args {
            v.visit_type_ref(arg);
        }
    }
}
