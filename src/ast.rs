use std::fmt;

use crate::ast::{namer::QualifiedName, pattern::MatchClause};

pub mod namer;
pub mod pattern;

pub use pattern::Pattern;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub row: u32,
    pub column: u32,
}

impl SourceLocation {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub const fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// A range on a single row, handy for tests and synthesized syntax.
    pub const fn on_row(row: u32, from: u32, to: u32) -> Self {
        Self {
            start: SourceLocation::new(row, from),
            end: SourceLocation::new(row, to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Located<A> {
    pub range: SourceRange,
    pub thing: A,
}

impl<A> Located<A> {
    pub const fn new(range: SourceRange, thing: A) -> Self {
        Self { range, thing }
    }

    pub fn map<B, F>(self, f: F) -> Located<B>
    where
        F: FnOnce(A) -> B,
    {
        Located {
            range: self.range,
            thing: f(self.thing),
        }
    }

    pub fn try_map<B, E, F>(self, f: F) -> Result<Located<B>, E>
    where
        F: FnOnce(A) -> Result<B, E>,
    {
        Ok(Located {
            range: self.range,
            thing: f(self.thing)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Dotted module path, `Data.Bits` is `{ head: "Data", tail: ["Bits"] }`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName {
    pub head: String,
    pub tail: Vec<String>,
}

impl ModuleName {
    pub fn new(head: &str) -> Self {
        Self {
            head: head.to_owned(),
            tail: vec![],
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.tail.push(suffix.to_owned());
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    NonAssociative,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Fixity {
    pub associativity: Associativity,
    pub level: u16,
}

impl Fixity {
    pub const fn new(associativity: Associativity, level: u16) -> Self {
        Self {
            associativity,
            level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Type,
    Number,
    Property,
    Arrow(Box<Kind>, Box<Kind>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    Constructor(QualifiedName),
    Parameter(Identifier),
    Apply(ApplyTypeExpr),
    Arrow(ArrowTypeExpr),
    Tuple(TupleTypeExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleTypeExpr(pub Vec<TypeExpression>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyTypeExpr {
    pub function: Box<TypeExpression>,
    pub argument: Box<TypeExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowTypeExpr {
    pub domain: Box<TypeExpression>,
    pub codomain: Box<TypeExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: Identifier,
    pub kind: Option<Kind>,
    pub range: Option<SourceRange>,
}

impl TypeParameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: Identifier::new(name),
            kind: None,
            range: None,
        }
    }
}

/// A polymorphic signature: `{a, b} a -> b -> a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub body: TypeExpression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Variable(Located<QualifiedName>),
    Constant(Literal),
    Tuple(Vec<Expr>),
    Apply(Box<Expr>, Vec<Expr>),
    Infix(Box<Expr>, Located<QualifiedName>, Box<Expr>),
    Lambda(Vec<Pattern>, Box<Expr>),
    Where(Box<Expr>, Vec<Declaration>),
    Comprehension(Box<Expr>, Vec<Vec<MatchClause>>),
    Located(SourceRange, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindingDefinition {
    Expr(Expr),
    Primitive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Located<Identifier>,
    pub parameters: Vec<Pattern>,
    pub definition: BindingDefinition,
    pub signature: Option<TypeSignature>,
    pub pragmas: Vec<Pragma>,
    pub fixity: Option<Fixity>,
    pub infix: bool,
}

impl Binding {
    pub fn new(name: Located<Identifier>, definition: Expr) -> Self {
        Self {
            name,
            parameters: vec![],
            definition: BindingDefinition::Expr(definition),
            signature: None,
            pragmas: vec![],
            fixity: None,
            infix: false,
        }
    }

    pub fn with_fixity(self, fixity: Fixity) -> Self {
        Self {
            fixity: Some(fixity),
            infix: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pragma {
    Note(String),
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSynonym {
    pub name: Located<Identifier>,
    pub parameters: Vec<TypeParameter>,
    pub body: TypeExpression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newtype {
    pub name: Located<Identifier>,
    pub parameters: Vec<TypeParameter>,
    pub fields: Vec<(Located<Identifier>, TypeExpression)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Signature(Vec<Located<Identifier>>, TypeSignature),
    Pragma(Vec<Located<Identifier>>, Pragma),
    Bind(Binding),
    // Desugared into plain bindings before naming.
    PatternBind(Pattern, Expr),
    // Folded into the bindings they name before naming.
    Fixity(Fixity, Vec<Located<Identifier>>),
    TypeSynonym(TypeSynonym),
    Newtype(Newtype),
    Located(SourceRange, Box<Declaration>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportSpec {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopLevel<A> {
    pub export: ExportSpec,
    pub thing: A,
}

impl<A> TopLevel<A> {
    pub fn public(thing: A) -> Self {
        Self {
            export: ExportSpec::Public,
            thing,
        }
    }

    pub fn private(thing: A) -> Self {
        Self {
            export: ExportSpec::Private,
            thing,
        }
    }

    pub fn is_public(&self) -> bool {
        self.export == ExportSpec::Public
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpec {
    Hiding(Vec<Identifier>),
    Only(Vec<Identifier>),
}

/// `import M as Q hiding (x, y)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: ModuleName,
    pub alias: Option<ModuleName>,
    pub spec: Option<ImportSpec>,
}

impl Import {
    pub fn new(module: ModuleName) -> Self {
        Self {
            module,
            alias: None,
            spec: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: Located<ModuleName>,
    pub imports: Vec<Located<Import>>,
    pub declarations: Vec<TopLevel<Declaration>>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { row, column } = self;
        write!(f, "{row}:{column}")
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { start, end } = self;
        write!(f, "{start}-{end}")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(id) = self;
        write!(f, "{id}")
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { head, tail } = self;
        write!(f, "{head}")?;
        for part in tail {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "infixl"),
            Self::Right => write!(f, "infixr"),
            Self::NonAssociative => write!(f, "infix"),
        }
    }
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            associativity,
            level,
        } = self;
        write!(f, "{associativity} {level}")
    }
}

impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor(name) => write!(f, "{name}"),
            Self::Parameter(name) => write!(f, "{name}"),
            Self::Apply(ApplyTypeExpr { function, argument }) => {
                write!(f, "{function} ({argument})")
            }
            Self::Arrow(ArrowTypeExpr { domain, codomain }) => {
                write!(f, "({domain} -> {codomain})")
            }
            Self::Tuple(TupleTypeExpr(elements)) => {
                write!(f, "(")?;
                let mut elements = elements.iter();
                if let Some(element) = elements.next() {
                    write!(f, "{element}")?;
                }
                for element in elements {
                    write!(f, ", {element}")?;
                }
                write!(f, ")")
            }
        }
    }
}
