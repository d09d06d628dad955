// ===================================================================
// FILE: parser.rs
//
// DESC: Recursive-descent parser over the token stream.
//
//       program    := statement*
//       statement  := "let" IDENT "=" expr
//                   | "def" IDENT "(" (IDENT ","?)* ")" "{" statement* "}"
//                   | expr ("=" expr)?
//       expr       := term (("+" | "-") term)*
//       term       := factor (("*" | "/") factor)*
//       factor     := NUMBER | "True" | "False" | IDENT | "(" expr ")"
// ===================================================================

use tern_ast::{Node, Program};

use crate::lexer::{tokenize, Spanned, Token};
use crate::ParseError;

/// Parse a complete source file.
pub fn parse_program(source: &str) -> Result<Program<'_>, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse()
}

pub struct Parser<'a> {
    tokens: Vec<Spanned<'a>>,
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Spanned<'a>>) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn parse(mut self) -> Result<Program<'a>, ParseError> {
        let mut items = Vec::new();
        while self.peek().is_some() {
            items.push(self.statement()?);
        }
        tracing::debug!(items = items.len(), "parsed program");
        Ok(Program { items })
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.current).map(|spanned| spanned.token)
    }

    fn advance(&mut self) -> Option<Spanned<'a>> {
        let spanned = self.tokens.get(self.current).copied();
        if spanned.is_some() {
            self.current += 1;
        }
        spanned
    }

    /// Consume the next token if it equals `token`.
    fn eat(&mut self, token: Token<'a>) -> bool {
        if self.peek() == Some(token) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token<'a>, expected: &'static str) -> Result<(), ParseError> {
        match self.advance() {
            Some(spanned) if spanned.token == token => Ok(()),
            Some(spanned) => Err(unexpected(expected, spanned)),
            None => Err(ParseError::UnexpectedEof { expected }),
        }
    }

    fn identifier(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        match self.advance() {
            Some(Spanned {
                token: Token::Identifier(name),
                ..
            }) => Ok(name),
            Some(spanned) => Err(unexpected(expected, spanned)),
            None => Err(ParseError::UnexpectedEof { expected }),
        }
    }

    fn statement(&mut self) -> Result<Node<'a>, ParseError> {
        match self.peek() {
            Some(Token::Let) => self.let_binding(),
            Some(Token::Def) => self.function(),
            _ => {
                let target = self.expr()?;
                if self.eat(Token::Equals) {
                    let value = self.expr()?;
                    Ok(Node::assign(target, value))
                } else {
                    Ok(target)
                }
            }
        }
    }

    fn let_binding(&mut self) -> Result<Node<'a>, ParseError> {
        self.expect(Token::Let, "`let`")?;
        let name = self.identifier("identifier after `let`")?;
        self.expect(Token::Equals, "`=`")?;
        let value = self.expr()?;
        Ok(Node::let_binding(Node::Identifier(name), value))
    }

    fn function(&mut self) -> Result<Node<'a>, ParseError> {
        self.expect(Token::Def, "`def`")?;
        let name = self.identifier("function name")?;

        self.expect(Token::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.eat(Token::RParen) {
            let param = self.identifier("parameter name")?;
            params.push(Node::Identifier(param));
            self.eat(Token::Comma);
        }

        self.expect(Token::LBrace, "`{`")?;
        let mut body = Vec::new();
        while !self.eat(Token::RBrace) {
            if self.peek().is_none() {
                return Err(ParseError::UnexpectedEof { expected: "`}`" });
            }
            body.push(self.statement()?);
        }

        Ok(Node::function(name, params, body))
    }

    fn expr(&mut self) -> Result<Node<'a>, ParseError> {
        let mut node = self.term()?;
        while let Some(Token::Operator(op @ ("+" | "-"))) = self.peek() {
            self.current += 1;
            let right = self.term()?;
            node = Node::binary(op, node, right);
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<Node<'a>, ParseError> {
        let mut node = self.factor()?;
        while let Some(Token::Operator(op @ ("*" | "/"))) = self.peek() {
            self.current += 1;
            let right = self.factor()?;
            node = Node::binary(op, node, right);
        }
        Ok(node)
    }

    fn factor(&mut self) -> Result<Node<'a>, ParseError> {
        const EXPECTED: &str = "number, boolean, identifier or `(`";
        let Some(spanned) = self.advance() else {
            return Err(ParseError::UnexpectedEof { expected: EXPECTED });
        };

        match spanned.token {
            Token::Number(text) => {
                text.parse::<i32>()
                    .map(Node::Number)
                    .map_err(|_| ParseError::IntegerOverflow {
                        text: text.to_string(),
                        offset: spanned.start,
                    })
            }
            Token::True => Ok(Node::Boolean(true)),
            Token::False => Ok(Node::Boolean(false)),
            Token::Identifier(name) => Ok(Node::Identifier(name)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            _ => Err(unexpected(EXPECTED, spanned)),
        }
    }
}

fn unexpected(expected: &'static str, spanned: Spanned) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: format!("{:?}", spanned.token),
        offset: spanned.start,
    }
}
