pub mod ast;

use crate::diagnostics::GenError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    file_id: u32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str, file_id: u32) -> Self {
        Self { tokens, source, pos: 0, file_id }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, n: usize) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(tok)
            if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected))
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.at(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<&Spanned<Token>, GenError> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(&self.tokens[self.pos - 1])
            }
            Some(tok) => Err(GenError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(GenError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, GenError> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                let span = tok.span;
                self.pos += 1;
                Ok(Spanned::new(name, span))
            }
            Some(tok) => Err(GenError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(GenError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::with_file(last.span.end, last.span.end, self.file_id)
        } else {
            Span::with_file(0, 0, self.file_id)
        }
    }

    fn prev_span(&self) -> Span {
        self.tokens
            .get(self.pos.wrapping_sub(1))
            .map(|t| t.span)
            .unwrap_or_else(|| self.eof_span())
    }

    fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or_else(|| self.eof_span())
    }

    // ===== Declarations =====

    pub fn parse_program(&mut self) -> Result<Program, GenError> {
        let mut program = Program::default();
        while let Some(tok) = self.peek() {
            match tok.node {
                Token::Using => {
                    let using = self.parse_using()?;
                    program.usings.push(using);
                }
                Token::Namespace => {
                    self.parse_namespace(&mut program)?;
                }
                _ => {
                    let decl = self.parse_type_decl(None)?;
                    program.types.push(decl);
                }
            }
        }
        Ok(program)
    }

    fn parse_using(&mut self) -> Result<Spanned<UsingDirective>, GenError> {
        let start = self.current_span();
        self.expect(&Token::Using)?;
        let path = self.parse_dotted_name()?;
        self.expect(&Token::Semi)?;
        Ok(Spanned::new(UsingDirective { path }, start.merge(self.prev_span())))
    }

    fn parse_namespace(&mut self, program: &mut Program) -> Result<(), GenError> {
        self.expect(&Token::Namespace)?;
        let path = self.parse_dotted_name()?;
        let ns = path.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".");
        self.expect(&Token::LBrace)?;
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(GenError::syntax("unterminated namespace body", self.eof_span()));
            }
            let decl = self.parse_type_decl(Some(&ns))?;
            program.types.push(decl);
        }
        self.expect(&Token::RBrace)?;
        Ok(())
    }

    fn parse_dotted_name(&mut self) -> Result<Vec<Spanned<String>>, GenError> {
        let mut path = vec![self.expect_ident()?];
        while self.eat(&Token::Dot) {
            path.push(self.expect_ident()?);
        }
        Ok(path)
    }

    fn parse_attributes(&mut self) -> Result<Vec<Spanned<Attribute>>, GenError> {
        let mut attributes = Vec::new();
        while self.at(&Token::LBracket) {
            let start = self.current_span();
            self.expect(&Token::LBracket)?;
            let name = self.expect_ident()?;
            let mut args = Vec::new();
            if self.eat(&Token::LParen) {
                while !self.at(&Token::RParen) {
                    let path = self.parse_dotted_name()?;
                    let span = path.first().unwrap().span.merge(path.last().unwrap().span);
                    let dotted =
                        path.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".");
                    args.push(Spanned::new(dotted, span));
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
            }
            self.expect(&Token::RBracket)?;
            attributes.push(Spanned::new(Attribute { name, args }, start.merge(self.prev_span())));
        }
        Ok(attributes)
    }

    fn parse_type_decl(&mut self, namespace: Option<&str>) -> Result<Spanned<TypeDecl>, GenError> {
        let start = self.current_span();
        let attributes = self.parse_attributes()?;

        let mut is_sealed = false;
        let mut is_abstract = false;
        let mut is_static = false;
        loop {
            match self.peek().map(|t| &t.node) {
                Some(Token::Public | Token::Private | Token::Internal | Token::Protected | Token::Partial) => {
                    self.advance();
                }
                Some(Token::Sealed) => {
                    is_sealed = true;
                    self.advance();
                }
                Some(Token::Abstract) => {
                    is_abstract = true;
                    self.advance();
                }
                Some(Token::Static) => {
                    is_static = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let kind = match self.peek().map(|t| &t.node) {
            Some(Token::Interface) => {
                self.advance();
                TypeKind::Interface
            }
            Some(Token::Class) => {
                self.advance();
                TypeKind::Class
            }
            Some(other) => {
                let other = other.clone();
                return Err(GenError::syntax(
                    format!("expected 'interface' or 'class', found {other}"),
                    self.current_span(),
                ));
            }
            None => {
                return Err(GenError::syntax(
                    "expected 'interface' or 'class', found end of file",
                    self.eof_span(),
                ));
            }
        };

        let name = self.expect_ident()?;
        let generic_params = self.parse_generic_params()?;

        let mut bases = Vec::new();
        if self.eat(&Token::Colon) {
            loop {
                bases.push(self.parse_type_ref()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }

        self.expect(&Token::LBrace)?;
        let mut members = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(GenError::syntax("unterminated type body", self.eof_span()));
            }
            members.push(self.parse_member()?);
        }
        self.expect(&Token::RBrace)?;

        Ok(Spanned::new(
            TypeDecl {
                attributes,
                kind,
                namespace: namespace.map(String::from),
                name,
                generic_params,
                is_sealed,
                is_abstract,
                is_static,
                bases,
                members,
            },
            start.merge(self.prev_span()),
        ))
    }

    fn parse_generic_params(&mut self) -> Result<Vec<Spanned<String>>, GenError> {
        let mut params = Vec::new();
        if self.eat(&Token::Lt) {
            loop {
                params.push(self.expect_ident()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::Gt)?;
        }
        Ok(params)
    }

    fn parse_member(&mut self) -> Result<Spanned<Member>, GenError> {
        let start = self.current_span();
        let attributes = self.parse_attributes()?;

        let mut modifiers = MemberModifiers::default();
        loop {
            match self.peek().map(|t| &t.node) {
                Some(Token::Public | Token::Private | Token::Internal | Token::Protected) => {
                    self.advance();
                }
                Some(Token::Static) => {
                    modifiers.is_static = true;
                    self.advance();
                }
                Some(Token::Virtual) => {
                    modifiers.is_virtual = true;
                    self.advance();
                }
                Some(Token::Abstract) => {
                    modifiers.is_abstract = true;
                    self.advance();
                }
                Some(Token::Override) => {
                    modifiers.is_override = true;
                    self.advance();
                }
                Some(Token::Readonly) => {
                    modifiers.is_readonly = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let return_type = self.parse_return_type()?;
        let name = self.expect_ident()?;

        match self.peek().map(|t| &t.node) {
            Some(Token::Lt | Token::LParen) => {
                let generic_params = self.parse_generic_params()?;
                let params = self.parse_params()?;
                let body = if self.eat(&Token::Semi) {
                    None
                } else {
                    Some(self.parse_block()?)
                };
                Ok(Spanned::new(
                    Member::Method(MethodDecl {
                        attributes,
                        modifiers,
                        return_type,
                        name,
                        generic_params,
                        params,
                        body,
                    }),
                    start.merge(self.prev_span()),
                ))
            }
            Some(Token::LBrace) => {
                self.expect(&Token::LBrace)?;
                let mut has_getter = false;
                let mut has_setter = false;
                while !self.at(&Token::RBrace) {
                    let accessor = self.expect_ident()?;
                    match accessor.node.as_str() {
                        "get" => has_getter = true,
                        "set" => has_setter = true,
                        other => {
                            return Err(GenError::syntax(
                                format!("expected 'get' or 'set', found '{other}'"),
                                accessor.span,
                            ));
                        }
                    }
                    self.expect(&Token::Semi)?;
                }
                self.expect(&Token::RBrace)?;
                Ok(Spanned::new(
                    Member::Property(PropertyDecl {
                        attributes,
                        modifiers,
                        ty: return_type,
                        name,
                        has_getter,
                        has_setter,
                    }),
                    start.merge(self.prev_span()),
                ))
            }
            Some(Token::Semi) => {
                self.advance();
                Ok(Spanned::new(
                    Member::Field(FieldDecl { attributes, modifiers, ty: return_type, name }),
                    start.merge(self.prev_span()),
                ))
            }
            Some(other) => {
                let other = other.clone();
                Err(GenError::syntax(
                    format!("expected '(', '{{' or ';' after member name, found {other}"),
                    self.current_span(),
                ))
            }
            None => Err(GenError::syntax(
                "expected member body, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn parse_return_type(&mut self) -> Result<Spanned<TypeRef>, GenError> {
        if self.at(&Token::Void) {
            let span = self.current_span();
            self.advance();
            Ok(Spanned::new(TypeRef::Void, span))
        } else {
            self.parse_type_ref()
        }
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, GenError> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        while !self.at(&Token::RParen) {
            let mode = match self.peek().map(|t| &t.node) {
                Some(Token::Ref) => {
                    self.advance();
                    ParamMode::Ref
                }
                Some(Token::Out) => {
                    self.advance();
                    ParamMode::Out
                }
                _ => ParamMode::Value,
            };
            let ty = self.parse_type_ref()?;
            let name = self.expect_ident()?;
            params.push(Param { mode, ty, name });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(params)
    }

    fn parse_type_ref(&mut self) -> Result<Spanned<TypeRef>, GenError> {
        if self.at(&Token::Void) {
            let span = self.current_span();
            self.advance();
            return Ok(Spanned::new(TypeRef::Void, span));
        }
        let start = self.current_span();
        let path = self.parse_dotted_name()?;
        let mut args = Vec::new();
        if self.eat(&Token::Lt) {
            loop {
                args.push(self.parse_type_ref()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::Gt)?;
        }
        Ok(Spanned::new(
            TypeRef::Named { path: path.into_iter().map(|s| s.node).collect(), args },
            start.merge(self.prev_span()),
        ))
    }

    // ===== Statements =====

    fn parse_block(&mut self) -> Result<Spanned<Block>, GenError> {
        let start = self.current_span();
        self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(GenError::syntax("unterminated block", self.eof_span()));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Block { stmts }, start.merge(self.prev_span())))
    }

    fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, GenError> {
        let start = self.current_span();
        match self.peek().map(|t| &t.node) {
            Some(Token::Var) => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(&Token::Assign)?;
                let value = self.parse_expr()?;
                self.expect(&Token::Semi)?;
                Ok(Spanned::new(Stmt::Var { name, value }, start.merge(self.prev_span())))
            }
            Some(Token::Return) => {
                self.advance();
                let value = if self.at(&Token::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&Token::Semi)?;
                Ok(Spanned::new(Stmt::Return(value), start.merge(self.prev_span())))
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&Token::Semi)?;
                Ok(Spanned::new(Stmt::Expr(expr), start.merge(self.prev_span())))
            }
        }
    }

    // ===== Expressions =====

    pub fn parse_expr(&mut self) -> Result<Spanned<Expr>, GenError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Spanned<Expr>, GenError> {
        if let Some(lambda) = self.try_parse_lambda()? {
            return Ok(lambda);
        }
        let lhs = self.parse_or()?;
        if self.at(&Token::Assign) {
            self.advance();
            let value = self.parse_assignment()?;
            if !matches!(lhs.node, Expr::Ident(_) | Expr::Member { .. }) {
                return Err(GenError::syntax("invalid assignment target", lhs.span));
            }
            let span = lhs.span.merge(value.span);
            return Ok(Spanned::new(
                Expr::Assign { target: Box::new(lhs), value: Box::new(value) },
                span,
            ));
        }
        Ok(lhs)
    }

    /// Lambdas need bounded lookahead: `x => ...` or `(a, b) => ...`.
    /// Returns None (with position restored) when the tokens are not a lambda.
    fn try_parse_lambda(&mut self) -> Result<Option<Spanned<Expr>>, GenError> {
        let start = self.current_span();
        // Single-parameter form: Ident '=>'
        if matches!(self.peek().map(|t| &t.node), Some(Token::Ident))
            && matches!(self.peek_at(1).map(|t| &t.node), Some(Token::Arrow))
        {
            let param = self.expect_ident()?;
            self.expect(&Token::Arrow)?;
            let body = self.parse_lambda_body()?;
            let span = start.merge(self.prev_span());
            return Ok(Some(Spanned::new(Expr::Lambda { params: vec![param], body }, span)));
        }
        // Parenthesized form: '(' idents ')' '=>'
        if self.at(&Token::LParen) {
            let saved = self.pos;
            self.advance();
            let mut params = Vec::new();
            let mut ok = true;
            while !self.at(&Token::RParen) {
                match self.peek().map(|t| &t.node) {
                    Some(Token::Ident) => params.push(self.expect_ident()?),
                    _ => {
                        ok = false;
                        break;
                    }
                }
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            if ok && self.eat(&Token::RParen) && self.eat(&Token::Arrow) {
                let body = self.parse_lambda_body()?;
                let span = start.merge(self.prev_span());
                return Ok(Some(Spanned::new(Expr::Lambda { params, body }, span)));
            }
            self.pos = saved;
        }
        Ok(None)
    }

    fn parse_lambda_body(&mut self) -> Result<LambdaBody, GenError> {
        if self.at(&Token::LBrace) {
            Ok(LambdaBody::Block(self.parse_block()?))
        } else {
            Ok(LambdaBody::Expr(Box::new(self.parse_expr()?)))
        }
    }

    fn parse_or(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut lhs = self.parse_and()?;
        while self.at(&Token::PipePipe) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut lhs = self.parse_equality()?;
        while self.at(&Token::AmpAmp) {
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.peek().map(|t| &t.node) {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::BangEq) => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_relational()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek().map(|t| &t.node) {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::LtEq) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::GtEq) => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().map(|t| &t.node) {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| &t.node) {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>, GenError> {
        let start = self.current_span();
        let op = match self.peek().map(|t| &t.node) {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Minus) => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, span));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Spanned<Expr>, GenError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().map(|t| &t.node) {
                Some(Token::Dot) => {
                    self.advance();
                    let name = self.expect_ident()?;
                    let span = expr.span.merge(name.span);
                    expr = Spanned::new(Expr::Member { object: Box::new(expr), name }, span);
                }
                Some(Token::LParen) => {
                    let args = self.parse_args()?;
                    let span = expr.span.merge(self.prev_span());
                    expr = Spanned::new(
                        Expr::Invoke { callee: Box::new(expr), generic_args: Vec::new(), args },
                        span,
                    );
                }
                // `name<T>(...)` is only attempted after a name; `a < b` falls
                // through to the relational parser when the try fails.
                Some(Token::Lt)
                    if matches!(expr.node, Expr::Ident(_) | Expr::Member { .. }) =>
                {
                    let saved = self.pos;
                    match self.try_parse_generic_invoke() {
                        Some(generic_args) => {
                            let args = self.parse_args()?;
                            let span = expr.span.merge(self.prev_span());
                            expr = Spanned::new(
                                Expr::Invoke { callee: Box::new(expr), generic_args, args },
                                span,
                            );
                        }
                        None => {
                            self.pos = saved;
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parse `<T, ...>` iff it is immediately followed by `(`. Leaves the
    /// position at the `(` on success; caller restores it on failure.
    fn try_parse_generic_invoke(&mut self) -> Option<Vec<Spanned<TypeRef>>> {
        if !self.eat(&Token::Lt) {
            return None;
        }
        let mut args = Vec::new();
        loop {
            match self.parse_type_ref() {
                Ok(ty) => args.push(ty),
                Err(_) => return None,
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        if !self.eat(&Token::Gt) {
            return None;
        }
        if !self.at(&Token::LParen) {
            return None;
        }
        Some(args)
    }

    fn parse_args(&mut self) -> Result<Vec<Spanned<Expr>>, GenError> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        while !self.at(&Token::RParen) {
            args.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, GenError> {
        let span = self.current_span();
        let tok = match self.peek() {
            Some(tok) => tok.node.clone(),
            None => {
                return Err(GenError::syntax("expected expression, found end of file", self.eof_span()));
            }
        };
        match tok {
            Token::IntLit(n) => {
                self.advance();
                Ok(Spanned::new(Expr::Int(n), span))
            }
            Token::LongLit(n) => {
                self.advance();
                Ok(Spanned::new(Expr::Long(n), span))
            }
            Token::FloatLit(n) => {
                self.advance();
                Ok(Spanned::new(Expr::Float(n), span))
            }
            Token::DoubleLit(n) => {
                self.advance();
                Ok(Spanned::new(Expr::Double(n), span))
            }
            Token::DecimalLit(s) => {
                self.advance();
                Ok(Spanned::new(Expr::Decimal(s), span))
            }
            Token::StringLit(s) => {
                self.advance();
                Ok(Spanned::new(Expr::Str(s), span))
            }
            Token::CharLit(c) => {
                self.advance();
                Ok(Spanned::new(Expr::Char(c), span))
            }
            Token::True => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(true), span))
            }
            Token::False => {
                self.advance();
                Ok(Spanned::new(Expr::Bool(false), span))
            }
            Token::Null => {
                self.advance();
                Ok(Spanned::new(Expr::Null, span))
            }
            Token::This => {
                self.advance();
                Ok(Spanned::new(Expr::This, span))
            }
            Token::Ident => {
                let name = self.expect_ident()?;
                Ok(Spanned::new(Expr::Ident(name.node), name.span))
            }
            Token::New => {
                self.advance();
                let ty = self.parse_type_ref()?;
                let args = self.parse_args()?;
                Ok(Spanned::new(Expr::New { ty, args }, span.merge(self.prev_span())))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(Spanned::new(inner.node, span.merge(self.prev_span())))
            }
            other => Err(GenError::syntax(
                format!("expected expression, found {other}"),
                span,
            )),
        }
    }
}

fn binary(op: BinaryOp, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
    let span = lhs.span.merge(rhs.span);
    Spanned::new(Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span)
}
