use std::collections::BTreeMap;

use crate::ast::{Fixity, ModuleName, namer::QualifiedName};

/// What a previously compiled module shows to its importers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub module: ModuleName,
    pub public: InterfaceDecls,
}

impl Interface {
    pub fn new(module: ModuleName) -> Self {
        Self {
            module,
            public: InterfaceDecls::default(),
        }
    }

    pub fn with_value(mut self, base: &str, fixity: Option<Fixity>) -> Self {
        let name = QualifiedName::qualified(self.module.clone(), base);
        self.public = self.public.with_value(name, fixity);
        self
    }

    pub fn with_synonym(mut self, base: &str) -> Self {
        let name = QualifiedName::qualified(self.module.clone(), base);
        self.public = self.public.with_synonym(name);
        self
    }

    pub fn with_newtype(mut self, base: &str) -> Self {
        let name = QualifiedName::qualified(self.module.clone(), base);
        self.public = self.public.with_newtype(name);
        self
    }
}

/// Exported declarations keyed by their module-qualified name. Several
/// declarations may share a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceDecls {
    pub values: BTreeMap<QualifiedName, Vec<InterfaceValue>>,
    pub synonyms: BTreeMap<QualifiedName, Vec<InterfaceSynonym>>,
    pub newtypes: BTreeMap<QualifiedName, Vec<InterfaceNewtype>>,
}

impl InterfaceDecls {
    pub fn with_value(mut self, name: QualifiedName, fixity: Option<Fixity>) -> Self {
        self.values
            .entry(name.clone())
            .or_default()
            .push(InterfaceValue { name, fixity });
        self
    }

    pub fn with_synonym(mut self, name: QualifiedName) -> Self {
        self.synonyms
            .entry(name.clone())
            .or_default()
            .push(InterfaceSynonym { name });
        self
    }

    pub fn with_newtype(mut self, name: QualifiedName) -> Self {
        self.newtypes
            .entry(name.clone())
            .or_default()
            .push(InterfaceNewtype { name });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceValue {
    pub name: QualifiedName,
    pub fixity: Option<Fixity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSynonym {
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceNewtype {
    pub name: QualifiedName,
}
