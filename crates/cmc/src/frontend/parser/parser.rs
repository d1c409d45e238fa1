//! Recursive descent parser for C-

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for C-
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Span,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let previous = current.span;
        Ok(Self { lexer, current, previous })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut declarations = Vec::new();

        while !self.at_end() {
            declarations.push(self.parse_declaration()?);
        }

        Ok(Program::new(declarations))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.previous = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance()?;
            Ok((name, token.span))
        } else {
            Err(CompileError::parser(
                format!("expected identifier, found {}", self.current.kind),
                self.current.span,
            ))
        }
    }

    /// Span from `start` up to the last consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_type(&mut self) -> CompileResult<Type> {
        match self.current.kind {
            TokenKind::Int => {
                self.advance()?;
                Ok(Type::Int)
            }
            TokenKind::Void => {
                self.advance()?;
                Ok(Type::Void)
            }
            _ => Err(CompileError::parser(
                format!("expected type specifier, found {}", self.current.kind),
                self.current.span,
            )),
        }
    }

    fn parse_declaration(&mut self) -> CompileResult<Declaration> {
        let start_span = self.current.span;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;

        if self.check(&TokenKind::LParen) {
            let func = self.parse_function_rest(ty, name, start_span)?;
            Ok(Declaration::Function(func))
        } else {
            let var = self.parse_var_decl_rest(ty, name, start_span)?;
            Ok(Declaration::Var(var))
        }
    }

    /// Local or global variable: `int x;` / `int a[10];`
    fn parse_var_decl(&mut self) -> CompileResult<VarDecl> {
        let start_span = self.current.span;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        self.parse_var_decl_rest(ty, name, start_span)
    }

    fn parse_var_decl_rest(&mut self, ty: Type, name: String, start_span: Span) -> CompileResult<VarDecl> {
        let decl = if self.match_token(&TokenKind::LBracket)? {
            let size = self.parse_array_size()?;
            self.expect(TokenKind::RBracket)?;
            self.expect(TokenKind::Semi)?;
            VarDecl::Array(ArrayDecl::new(name, ty, Some(size), self.span_from(start_span)))
        } else {
            self.expect(TokenKind::Semi)?;
            VarDecl::Scalar(ScalarDecl::new(name, ty, self.span_from(start_span)))
        };
        Ok(decl)
    }

    fn parse_array_size(&mut self) -> CompileResult<usize> {
        let token = self.expect(TokenKind::Number(String::new()))?;
        let TokenKind::Number(text) = &token.kind else {
            unreachable!("expect() only returns the requested token kind");
        };
        text.parse().map_err(|_| {
            CompileError::parser(format!("invalid array size: {text}"), token.span)
        })
    }

    fn parse_function_rest(&mut self, return_type: Type, name: String, start_span: Span) -> CompileResult<FuncDecl> {
        self.expect(TokenKind::LParen)?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = self.span_from(start_span);
        Ok(FuncDecl::new(name, return_type, params, body, span))
    }

    fn parse_parameter_list(&mut self) -> CompileResult<Vec<VarDecl>> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // `(void)` is an empty list; `(void x)` is a (rejected later) void parameter
        if self.check(&TokenKind::Void) {
            let void_span = self.current.span;
            self.advance()?;
            if self.check(&TokenKind::RParen) {
                return Ok(params);
            }
            params.push(self.parse_param_rest(Type::Void, void_span)?);
            if !self.match_token(&TokenKind::Comma)? {
                return Ok(params);
            }
        }

        loop {
            let start_span = self.current.span;
            let ty = self.parse_type()?;
            params.push(self.parse_param_rest(ty, start_span)?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    fn parse_param_rest(&mut self, ty: Type, start_span: Span) -> CompileResult<VarDecl> {
        let (name, _) = self.expect_identifier()?;
        if self.match_token(&TokenKind::LBracket)? {
            self.expect(TokenKind::RBracket)?;
            Ok(VarDecl::Array(ArrayDecl::new(name, ty, None, self.span_from(start_span))))
        } else {
            Ok(VarDecl::Scalar(ScalarDecl::new(name, ty, self.span_from(start_span))))
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> CompileResult<Block> {
        self.expect(TokenKind::LBrace)?;

        let mut decls = Vec::new();
        while self.current.kind.is_type_specifier() {
            decls.push(self.parse_var_decl()?);
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(decls, stmts))
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;

        match &self.current.kind {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                Ok(Stmt::new(StmtKind::Compound(block), self.span_from(start_span)))
            }

            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Return => self.parse_return_statement(),

            TokenKind::Semi => {
                self.advance()?;
                Ok(Stmt::new(StmtKind::Empty, start_span))
            }

            kind if kind.is_type_specifier() => Err(CompileError::parser(
                "declarations must precede statements in a block",
                start_span,
            )),

            _ => self.parse_expression_statement(),
        }
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            self.span_from(start_span),
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::new(StmtKind::While { condition, body }, self.span_from(start_span)))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Return)?;

        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Return(value), self.span_from(start_span)))
    }

    fn parse_expression_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Expr(expr), self.span_from(start_span)))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        let left = self.parse_simple_expression()?;

        if !self.check(&TokenKind::Eq) {
            return Ok(left);
        }

        let eq_span = self.advance()?.span;
        let ExprKind::Var(target) = left.kind else {
            return Err(CompileError::parser("invalid assignment target", eq_span));
        };
        let value = self.parse_expression()?;
        let span = left.span.merge(value.span);

        Ok(Expr::new(
            ExprKind::Assign {
                target,
                value: Box::new(value),
            },
            span,
        ))
    }

    /// Relational operators do not chain: `a < b < c` is a syntax error
    fn parse_simple_expression(&mut self) -> CompileResult<Expr> {
        let left = self.parse_additive_expression()?;

        let op = match &self.current.kind {
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_additive_expression()?;
        Ok(Self::binary(op, left, right))
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_factor()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    fn parse_factor(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match &self.current.kind {
            TokenKind::Number(s) => {
                let value = s.parse().map_err(|_| {
                    CompileError::parser(format!("invalid integer literal: {s}"), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::IntLiteral(value), span))
            }
            TokenKind::Identifier(_) => {
                let (name, name_span) = self.expect_identifier()?;
                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RParen)?;
                    Ok(Expr::new(ExprKind::Call { name, args }, self.span_from(name_span)))
                } else {
                    let var = self.parse_variable_rest(name, name_span)?;
                    let span = var.span;
                    Ok(Expr::new(ExprKind::Var(var), span))
                }
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }

    fn parse_variable_rest(&mut self, name: String, name_span: Span) -> CompileResult<Variable> {
        if self.match_token(&TokenKind::LBracket)? {
            let index = self.parse_expression()?;
            self.expect(TokenKind::RBracket)?;
            Ok(Variable::new(
                VariableKind::Indexed {
                    name,
                    index: Box::new(index),
                },
                self.span_from(name_span),
            ))
        } else {
            Ok(Variable::new(VariableKind::Simple(name), name_span))
        }
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(args)
    }
}
