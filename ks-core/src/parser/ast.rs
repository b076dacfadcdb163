use std::{fmt::Display, rc::Rc};

use crate::{
    lexer::prelude::{escape, format_number, LexResult, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::{ensure_sufficient_stack, SrcSpan}
};

// program -> { <statement> } EOF
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut statements = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::Eof, _)) => break,
                Some(_) => statements.push(Statement::parse(parser, None)?),
                None => return parser.unexpected(vec![])
            }
        }

        let start = statements.first()
            .map(|statement| statement.location().start)
            .unwrap_or_default();

        Ok(Self {
            statements,
            location: SrcSpan { start, end: parser.last_end() }
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("\n"))
    }
}

// statement -> <var> | <function> | <block> | <if> | <while> | <for>
//            | return [<expression>] ; | break ; | continue ; | <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var(VarDeclaration),
    Function(FunctionDeclaration),
    Block(Block),
    If(Conditional),
    While(ConditionalLoop),
    For(ForLoop),
    Return(Return),
    Break(SrcSpan),
    Continue(SrcSpan),
    Expression {
        expression: Expression,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| -> Result<Self, ParseError> {
            let statement = match &parser.current_token {
                Some((_, Token::Var, _)) => Self::Var(VarDeclaration::parse(parser, None)?),
                Some((_, Token::Function, _)) => Self::Function(FunctionDeclaration::parse(parser, None)?),
                Some((_, Token::LBrace, _)) => Self::Block(Block::parse(parser, None)?),
                Some((_, Token::If, _)) => Self::If(Conditional::parse(parser, None)?),
                Some((_, Token::While, _)) => Self::While(ConditionalLoop::parse(parser, None)?),
                Some((_, Token::For, _)) => Self::For(ForLoop::parse(parser, None)?),
                Some((_, Token::Return, _)) => Self::Return(Return::parse(parser, None)?),
                Some((_, Token::Break, _)) => {
                    let (start, _) = parser.expect_one(Token::Break)?;
                    let end = parser.expect_semicolon()?;

                    Self::Break(SrcSpan { start, end })
                },
                Some((_, Token::Continue, _)) => {
                    let (start, _) = parser.expect_one(Token::Continue)?;
                    let end = parser.expect_semicolon()?;

                    Self::Continue(SrcSpan { start, end })
                },
                _ => {
                    let expression = Expression::parse(parser, None)?;
                    let start = expression.location().start;
                    let end = parser.expect_semicolon()?;

                    Self::Expression {
                        expression,
                        location: SrcSpan { start, end }
                    }
                }
            };

            Ok(statement)
        })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Var(var) => write!(f, "{var}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Block(block) => write!(f, "{block}"),
            Self::If(conditional) => write!(f, "{conditional}"),
            Self::While(loop_) => write!(f, "{loop_}"),
            Self::For(loop_) => write!(f, "{loop_}"),
            Self::Return(return_) => write!(f, "{return_}"),
            Self::Break(_) => write!(f, "break;"),
            Self::Continue(_) => write!(f, "continue;"),
            Self::Expression { expression, .. } => write!(f, "{expression};")
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Var(var) => var.location,
            Self::Function(function) => function.location,
            Self::Block(block) => block.location,
            Self::If(conditional) => conditional.location,
            Self::While(loop_) => loop_.location,
            Self::For(loop_) => loop_.location,
            Self::Return(return_) => return_.location,
            Self::Break(location) | Self::Continue(location) => *location,
            Self::Expression { location, .. } => *location
        }
    }
}

// var -> var <identifier> [= <expression>] ;
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclaration {
    pub name: Identifier,
    pub value: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VarDeclaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Var)?;
        let name = Identifier::from(parser.expect_ident()?);

        let value = match parser.current_is(&Token::Assign) {
            true => {
                parser.step();
                Some(Expression::parse(parser, None)?)
            },
            false => None
        };

        let end = parser.expect_semicolon()?;

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for VarDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "var {} = {};", self.name, value),
            None => write!(f, "var {};", self.name)
        }
    }
}

// function -> function <identifier> ( [<identifier> {, <identifier>}] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub function: Rc<FunctionLiteral>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionDeclaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Function)?;
        let name = Identifier::from(parser.expect_ident()?);

        let function = FunctionLiteral::parse_rest(parser, start, Some(name.value.clone()))?;
        let location = function.location;

        Ok(Self {
            name,
            function: Rc::new(function),
            location
        })
    }
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "function {}({}) {}",
            self.name,
            self.function.parameter_list(),
            self.function.body
        )
    }
}

/// Parameters and body shared by declarations, function expressions and the
/// closures created from them.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub name: Option<String>,
    pub params: Vec<Identifier>,
    pub body: Block,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Function)?;

        Self::parse_rest(parser, start, None)
    }
}

impl FunctionLiteral {
    fn parse_rest<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        start: u32,
        name: Option<String>
    ) -> Result<Self, ParseError> {
        parser.expect_one(Token::LParen)?;

        let mut params: Vec<Identifier> = vec![];

        if !parser.current_is(&Token::RParen) {
            loop {
                let param = Identifier::from(parser.expect_ident()?);

                if params.iter().any(|p| p.value == param.value) {
                    return parse_error(
                        ParseErrorType::DuplicateParameter { name: param.value },
                        param.location
                    );
                }

                params.push(param);

                match parser.current_is(&Token::Comma) {
                    true => parser.step(),
                    false => break
                }
            }
        }

        parser.expect_one(Token::RParen)?;

        let body = Block::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            name,
            params,
            body,
            location: SrcSpan { start, end }
        })
    }

    pub fn parameter_list(&self) -> String {
        self.params.iter()
            .map(|param| param.value.clone())
            .collect::<Vec<String>>()
            .join(", ")
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "function({}) {}", self.parameter_list(), self.body)
    }
}

// block -> { { <statement> } }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Block {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut statements = vec![];

        loop {
            match &parser.current_token {
                Some((_, Token::RBrace, _)) => break,
                Some((_, Token::Eof, _)) | None => return parser.unexpected(vec!["`}`".to_string()]),
                Some(_) => statements.push(Statement::parse(parser, None)?)
            }
        }

        let (_, end) = parser.expect_one(Token::RBrace)?;

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{}}");
        }

        let statements = self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>();

        write!(f, "{{ {} }}", statements.join(" "))
    }
}

// if -> if ( <expression> ) <statement> [else <statement>]
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Expression,
    pub resolution: Box<Statement>,
    pub alternative: Option<Box<Statement>>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Conditional {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let resolution = Box::new(Statement::parse(parser, None)?);

        let mut end = resolution.location().end;

        // binds to the nearest `if`
        let alternative = match parser.current_is(&Token::Else) {
            true => {
                parser.step();

                let alternative = Statement::parse(parser, None)?;
                end = alternative.location().end;

                Some(Box::new(alternative))
            },
            false => None
        };

        Ok(Self {
            condition,
            resolution,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Conditional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.resolution)?;

        match &self.alternative {
            Some(alternative) => write!(f, " else {alternative}"),
            None => Ok(())
        }
    }
}

// while -> while ( <expression> ) <statement>
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalLoop {
    pub condition: Expression,
    pub block: Box<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ConditionalLoop {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::While)?;

        parser.expect_one(Token::LParen)?;
        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let block = Box::new(Statement::parse(parser, None)?);
        let end = block.location().end;

        Ok(Self {
            condition,
            block,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ConditionalLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "while ({}) {}", self.condition, self.block)
    }
}

// for -> for ( [<var> | <expression> ;] [<expression>] ; [<expression>] ) <statement>
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub init: Option<Box<Statement>>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub block: Box<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ForLoop {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::For)?;
        parser.expect_one(Token::LParen)?;

        let init = match &parser.current_token {
            Some((_, Token::Semicolon, _)) => {
                parser.step();
                None
            },
            Some((_, Token::Var, _)) => Some(Box::new(Statement::Var(VarDeclaration::parse(parser, None)?))),
            _ => {
                let expression = Expression::parse(parser, None)?;
                let start = expression.location().start;
                let end = parser.expect_semicolon()?;

                Some(Box::new(Statement::Expression {
                    expression,
                    location: SrcSpan { start, end }
                }))
            }
        };

        let condition = match parser.current_is(&Token::Semicolon) {
            true => None,
            false => Some(Expression::parse(parser, None)?)
        };
        parser.expect_one(Token::Semicolon)?;

        let update = match parser.current_is(&Token::RParen) {
            true => None,
            false => Some(Expression::parse(parser, None)?)
        };
        parser.expect_one(Token::RParen)?;

        let block = Box::new(Statement::parse(parser, None)?);
        let end = block.location().end;

        Ok(Self {
            init,
            condition,
            update,
            block,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ForLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let init = self.init.as_ref()
            .map_or(";".to_string(), |init| init.to_string());
        let condition = self.condition.as_ref()
            .map_or(String::new(), |condition| format!(" {condition}"));
        let update = self.update.as_ref()
            .map_or(String::new(), |update| format!(" {update}"));

        write!(f, "for ({init}{condition};{update}) {}", self.block)
    }
}

// return -> return [<expression>] ;
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Return {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Return)?;

        let value = match parser.current_is(&Token::Semicolon) {
            true => None,
            false => Some(Expression::parse(parser, None)?)
        };

        let end = parser.expect_semicolon()?;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {value};"),
            None => write!(f, "return;")
        }
    }
}

// expression -> <identifier> | <literal> | <infix> | <prefix> | <call> | <index>
//             | <assignment> | <list> | <map> | <function> | "(" <expression> ")"
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    Infix(Infix),
    Prefix(Prefix),
    Call(Call),
    Index(Index),
    Assignment(Assignment),
    List(ListLiteral),
    Map(MapLiteral),
    Function(Rc<FunctionLiteral>),
    Nested {
        expression: Box<Expression>,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| -> Result<Self, ParseError> {
            let mut expr = match &parser.current_token {
                Some((_, Token::Ident(_), _)) => Self::Identifier(parser.expect_ident()?.into()),
                Some((_, Token::Number(_) | Token::String(_) | Token::True | Token::False | Token::Null, _)) => {
                    Self::Literal(Literal::parse(parser, None)?)
                },
                Some((_, Token::Minus | Token::Bang, _)) => Self::Prefix(Prefix::parse(parser, None)?),
                Some((_, Token::LSBracket, _)) => Self::List(ListLiteral::parse(parser, None)?),
                Some((_, Token::LBrace, _)) => Self::Map(MapLiteral::parse(parser, None)?),
                Some((_, Token::Function, _)) => Self::Function(Rc::new(FunctionLiteral::parse(parser, None)?)),
                Some((_, Token::LParen, _)) => {
                    let (start, _) = parser.expect_one(Token::LParen)?;

                    let expression = Box::new(Expression::parse(parser, None)?);

                    let (_, end) = parser.expect_one(Token::RParen)?;

                    Self::Nested {
                        expression,
                        location: SrcSpan { start, end }
                    }
                },
                _ => return parser.unexpected(vec![
                    "an expression".to_string()
                ])
            };

            while precedence.unwrap_or(Precedence::Lowest) < parser.current_precedence() {
                expr = match &parser.current_token {
                    Some((_, Token::Assign, _)) => Self::Assignment(Assignment::parse(parser, expr, precedence)?),
                    Some((_, Token::LParen, _)) => Self::Call(Call::parse(parser, expr, precedence)?),
                    Some((_, Token::LSBracket, _)) => Self::Index(Index::parse(parser, expr, precedence)?),
                    Some(_) => Self::Infix(Infix::parse(parser, expr, precedence)?),
                    None => break
                }
            }

            Ok(expr)
        })
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Call(call) => write!(f, "{call}"),
            Self::Index(index) => write!(f, "{index}"),
            Self::Assignment(assignment) => write!(f, "{assignment}"),
            Self::List(list) => write!(f, "{list}"),
            Self::Map(map) => write!(f, "{map}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Nested { expression, .. } => write!(f, "({expression})")
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(ident) => ident.location,
            Self::Literal(literal) => literal.location(),
            Self::Infix(infix) => infix.location,
            Self::Prefix(prefix) => prefix.location,
            Self::Call(call) => call.location,
            Self::Index(index) => index.location,
            Self::Assignment(assignment) => assignment.location,
            Self::List(list) => list.location,
            Self::Map(map) => map.location,
            Self::Function(function) => function.location,
            Self::Nested { location, .. } => *location
        }
    }
}

// identifier -> (<letter> | _) { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// literal -> <number> | <string> | true | false | null
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number {
        value: f64,
        location: SrcSpan
    },
    String {
        value: String,
        location: SrcSpan
    },
    Boolean {
        value: bool,
        location: SrcSpan
    },
    Null {
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Literal {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let literal = match &parser.current_token {
            Some((start, token, end)) => {
                let location = SrcSpan { start: *start, end: *end };

                match token {
                    Token::Number(value) => Self::Number { value: *value, location },
                    Token::String(value) => Self::String { value: value.clone(), location },
                    Token::True => Self::Boolean { value: true, location },
                    Token::False => Self::Boolean { value: false, location },
                    Token::Null => Self::Null { location },
                    _ => return parser.unexpected(vec!["a literal".to_string()])
                }
            },
            None => return parser.unexpected(vec!["a literal".to_string()])
        };

        parser.step();

        Ok(literal)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { value, .. } => write!(f, "{}", format_number(*value)),
            Self::String { value, .. } => write!(f, "\"{}\"", escape(value)),
            Self::Boolean { value, .. } => write!(f, "{value}"),
            Self::Null { .. } => write!(f, "null")
        }
    }
}

impl Literal {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Number { location, .. } |
            Self::String { location, .. } |
            Self::Boolean { location, .. } |
            Self::Null { location } => *location
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl InfixOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Plus,
            Token::Minus => Self::Minus,
            Token::Star => Self::Multiply,
            Token::Slash => Self::Divide,
            Token::Percent => Self::Modulo,
            Token::Equal => Self::Equal,
            Token::NotEqual => Self::NotEqual,
            Token::LessThan => Self::LessThan,
            Token::LessThanOrEqual => Self::LessThanOrEqual,
            Token::GreaterThan => Self::GreaterThan,
            Token::GreaterThanOrEqual => Self::GreaterThanOrEqual,
            Token::And => Self::And,
            Token::Or => Self::Or,
            _ => return None
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();

        let SrcSpan { start, .. } = left.location();

        let operator = match &parser.current_token {
            Some((_, token, _)) => InfixOperator::from_token(token),
            None => None
        };

        let operator = match operator {
            Some(operator) => {
                parser.step();
                operator
            },
            None => return parser.unexpected(vec!["an operator".to_string()])
        };

        // same precedence on the right makes the operator left-associative
        let right = Expression::parse(parser, Some(precedence))?;

        let SrcSpan { end, .. } = right.location();

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Negate,
    Not,
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!")
        }
    }
}

// prefix -> (- | !) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: PrefixOperator,
    pub expression: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Prefix {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, operator) = match &parser.current_token {
            Some((start, Token::Minus, _)) => (*start, PrefixOperator::Negate),
            Some((start, Token::Bang, _)) => (*start, PrefixOperator::Not),
            _ => return parser.unexpected(vec!["`-`".to_string(), "`!`".to_string()])
        };

        parser.step();

        let expression = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = expression.location().end;

        Ok(Self {
            operator,
            expression: Box::new(expression),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.operator, self.expression)
    }
}

// call -> <expression> ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = left.location().start;

        parser.expect_one(Token::LParen)?;
        let arguments = parse_expression_list(parser, Token::RParen)?;
        let (_, end) = parser.expect_one(Token::RParen)?;

        Ok(Self {
            function: Box::new(left),
            arguments,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.function, join(&self.arguments))
    }
}

// index -> <expression> [ <expression> ]
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub collection: Box<Expression>,
    pub index: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Index {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = left.location().start;

        parser.expect_one(Token::LSBracket)?;
        let index = Expression::parse(parser, None)?;
        let (_, end) = parser.expect_one(Token::RSBracket)?;

        Ok(Self {
            collection: Box::new(left),
            index: Box::new(index),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.collection, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Identifier(Identifier),
    Index(Index),
}

impl Display for AssignTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Index(index) => write!(f, "{index}")
        }
    }
}

// assignment -> (<identifier> | <index>) = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: AssignTarget,
    pub value: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Assignment {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let start = left.location().start;

        let target = match left {
            Expression::Identifier(ident) => AssignTarget::Identifier(ident),
            Expression::Index(index) => AssignTarget::Index(index),
            other => return parse_error(
                ParseErrorType::InvalidAssignmentTarget,
                other.location()
            )
        };

        parser.expect_one(Token::Assign)?;

        // right-associative: `a = b = c` assigns `c` to both
        let value = Expression::parse(parser, Some(Precedence::Lowest))?;
        let end = value.location().end;

        Ok(Self {
            target,
            value: Box::new(value),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

// list -> [ [<expression> {, <expression>}] ]
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub items: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ListLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LSBracket)?;
        let items = parse_expression_list(parser, Token::RSBracket)?;
        let (_, end) = parser.expect_one(Token::RSBracket)?;

        Ok(Self {
            items,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ListLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", join(&self.items))
    }
}

// map -> { [<expression> : <expression> {, <expression> : <expression>}] }
#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteral {
    pub entries: Vec<(Expression, Expression)>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for MapLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut entries = vec![];

        if !parser.current_is(&Token::RBrace) {
            loop {
                let key = Expression::parse(parser, None)?;
                parser.expect_one(Token::Colon)?;
                let value = Expression::parse(parser, None)?;

                entries.push((key, value));

                match parser.current_is(&Token::Comma) {
                    true => parser.step(),
                    false => break
                }
            }
        }

        let (_, end) = parser.expect_one(Token::RBrace)?;

        Ok(Self {
            entries,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for MapLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<String>>();

        write!(f, "{{{}}}", entries.join(", "))
    }
}

fn parse_expression_list<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>,
    closing: Token
) -> Result<Vec<Expression>, ParseError> {
    let mut expressions = vec![];

    if parser.current_is(&closing) {
        return Ok(expressions);
    }

    loop {
        expressions.push(Expression::parse(parser, None)?);

        match parser.current_is(&Token::Comma) {
            true => parser.step(),
            false => break
        }
    }

    Ok(expressions)
}

fn join(expressions: &[Expression]) -> String {
    expressions.iter()
        .map(|expression| expression.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}
