use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    ast::{
        Binding, BindingDefinition, Declaration, Expr, Module, ModuleName, SourceRange,
        namer::{BindsNames, NamingEnv, NamingError},
        pattern::MatchClause,
    },
    interface::Interface,
};

#[derive(Debug, Error, PartialEq)]
pub enum CompilationError {
    #[error("naming error: {0}")]
    Naming(#[from] NamingError),

    #[error("module {module} imports {import} at {location}, but no interface for it is loaded")]
    MissingInterface {
        module: ModuleName,
        import: ModuleName,
        location: SourceRange,
    },
}

pub type Compilation<A = NamingEnv> = Result<A, CompilationError>;

/// The naming stage of the pipeline. Knows the interfaces of every module
/// compiled so far.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    interfaces: BTreeMap<ModuleName, Interface>,
}

impl Compiler {
    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.insert(interface.module.clone(), interface);
        self
    }

    pub fn interface(&self, module: &ModuleName) -> Option<&Interface> {
        self.interfaces.get(module)
    }

    /// Everything `module` imports, side by side. Two imports exposing the
    /// same name leave both candidates in place.
    pub fn imports_env(&self, module: &Module) -> Compilation {
        module
            .imports
            .iter()
            .map(|import| -> Compilation {
                let interface = self.interface(&import.thing.module).ok_or_else(|| {
                    CompilationError::MissingInterface {
                        module: module.name.thing.clone(),
                        import: import.thing.module.clone(),
                        location: import.range,
                    }
                })?;

                debug!(
                    "imports_env: {} imports {}",
                    module.name.thing, import.thing.module
                );

                Ok(import.thing.interpret(&interface.public)?)
            })
            .collect()
    }

    /// The top-level scope of `module`: its own members hide its imports.
    pub fn module_scope(&self, module: &Module) -> Compilation {
        info!("module_scope: naming {}", module.name.thing);

        let imports = self.imports_env(module)?;
        Ok(imports.merge_shadowing(module.naming_env()?))
    }
}

/// The scope inside a `where` block nested in `outer`.
pub fn local_scope(outer: &NamingEnv, declarations: &[Declaration]) -> Compilation {
    Ok(outer.clone().merge_shadowing(declarations.naming_env()?))
}

/// The scope after one comprehension arm: its clauses bind side by side.
pub fn clause_scope(outer: &NamingEnv, clauses: &[MatchClause]) -> Compilation {
    Ok(outer.clone().merge_shadowing(clauses.naming_env()?))
}

/// The scope of a binding's body: parameters hide `outer`, and the body's
/// `where` block hides the parameters.
pub fn binding_scope(outer: &NamingEnv, binding: &Binding) -> Compilation {
    let parameters = outer
        .clone()
        .merge_shadowing(binding.parameters.naming_env()?);

    match &binding.definition {
        BindingDefinition::Expr(body) => local_scope(&parameters, where_declarations(body)),
        BindingDefinition::Primitive => Ok(parameters),
    }
}

fn where_declarations(body: &Expr) -> &[Declaration] {
    match body {
        Expr::Where(_, declarations) => declarations.as_slice(),
        Expr::Located(_, body) => where_declarations(body),
        _otherwise => &[],
    }
}
