use tracing::debug;

use crate::{
    ast::{
        Import, ImportSpec,
        namer::{BindsNames, Naming, NamingEnv, QualifiedName},
    },
    interface::InterfaceDecls,
};

impl Import {
    /// The names `import M [as Q] [hiding (..) | (..)]` brings into scope.
    /// Keys become `f` or `Q.f`; every record still points at `M.f`.
    pub fn interpret(&self, public: &InterfaceDecls) -> Naming<NamingEnv> {
        debug!("interpret: import {}", self.module);

        let env = public
            .naming_env()?
            .filter_names(|name| self.admits(name));

        Ok(match &self.alias {
            Some(alias) => env.map_keys(|name| name.in_module(alias)),
            None => env.map_keys(QualifiedName::unqualify),
        })
    }

    fn admits(&self, name: &QualifiedName) -> bool {
        match &self.spec {
            None => true,
            Some(ImportSpec::Hiding(hidden)) => !hidden.contains(name.base()),
            Some(ImportSpec::Only(listed)) => listed.contains(name.base()),
        }
    }
}
