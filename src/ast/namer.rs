use std::{fmt, result};

use thiserror::Error;

use crate::ast::{Identifier, ModuleName, SourceRange};

pub mod binds;
pub mod environment;
pub mod import;
pub mod provenance;

pub use binds::BindsNames;
pub use environment::NamingEnv;
pub use provenance::{NameOrigin, TermNameRecord, TypeNameRecord};

/// Either a bare `f` or a module-owned `M.f`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualifiedName {
    module: Option<ModuleName>,
    base: Identifier,
}

impl QualifiedName {
    pub fn new(module: Option<ModuleName>, base: Identifier) -> Self {
        Self { module, base }
    }

    pub fn unqualified(base: &str) -> Self {
        Self {
            module: None,
            base: Identifier::new(base),
        }
    }

    pub fn qualified(module: ModuleName, base: &str) -> Self {
        Self {
            module: Some(module),
            base: Identifier::new(base),
        }
    }

    pub fn from_identifier(base: Identifier) -> Self {
        Self { module: None, base }
    }

    pub fn module(&self) -> Option<&ModuleName> {
        self.module.as_ref()
    }

    pub fn base(&self) -> &Identifier {
        &self.base
    }

    pub fn is_qualified(&self) -> bool {
        self.module.is_some()
    }

    /// The same base name owned by `module`, replacing any previous owner.
    pub fn in_module(&self, module: &ModuleName) -> Self {
        Self {
            module: Some(module.clone()),
            base: self.base.clone(),
        }
    }

    pub fn unqualify(&self) -> Self {
        Self {
            module: None,
            base: self.base.clone(),
        }
    }
}

impl From<Identifier> for QualifiedName {
    fn from(base: Identifier) -> Self {
        Self::from_identifier(base)
    }
}

/// Raised when syntax that earlier passes must have removed reaches the namer.
/// These are compiler bugs, never user errors.
#[derive(Debug, Error, PartialEq)]
pub enum NamingError {
    #[error(
        "internal invariant violated{}: pattern binding `{}` should have been desugared into plain bindings before naming",
        at(.location),
        .pattern
    )]
    UnexpectedPatternBinding {
        pattern: String,
        location: Option<SourceRange>,
    },

    #[error(
        "internal invariant violated{}: fixity declaration for `{}` should have been attached to its bindings before naming",
        at(.location),
        .names
    )]
    UnexpectedFixityDeclaration {
        names: String,
        location: Option<SourceRange>,
    },
}

fn at(location: &Option<SourceRange>) -> String {
    location
        .map(|range| format!(" at {range}"))
        .unwrap_or_default()
}

pub type Naming<A> = result::Result<A, NamingError>;

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { module, base } = self;
        if let Some(module) = module {
            write!(f, "{module}.")?;
        }
        write!(f, "{base}")
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        ModuleName, SourceRange,
        namer::{NamingError, QualifiedName},
    };

    #[test]
    fn unqualified_names_order_before_qualified_ones() {
        let bare = QualifiedName::unqualified("z");
        let owned = QualifiedName::qualified(ModuleName::new("A"), "a");

        assert!(bare < owned);
        assert_eq!(owned.to_string(), "A.a");
        assert_eq!(bare.to_string(), "z");
    }

    #[test]
    fn in_module_replaces_the_owner() {
        let nested = ModuleName::new("Data").with_suffix("Bits");
        let name = QualifiedName::qualified(ModuleName::new("Old"), "shift");

        assert_eq!(name.in_module(&nested).to_string(), "Data.Bits.shift");
        assert_eq!(name.unqualify(), QualifiedName::unqualified("shift"));
    }

    #[test]
    fn invariant_errors_mention_the_location() {
        let error = NamingError::UnexpectedFixityDeclaration {
            names: "<+>".to_owned(),
            location: Some(SourceRange::on_row(4, 1, 12)),
        };

        assert_eq!(
            error.to_string(),
            "internal invariant violated at 4:1-4:12: fixity declaration for `<+>` should have been attached to its bindings before naming"
        );
    }
}
