//! The program arena and its declaration query surface
//!
//! [`Program`] owns every module, class, function, and property of one
//! compilation session, plus the [`crate::ty::TypeContext`]. The transformer
//! core only talks to declarations through this surface.

use rustc_hash::FxHashSet;

use crate::decl::{
    Class, ClassId, Function, FunctionId, Module, ModuleId, PlatformKind, Property, PropertyId,
    QualifiedName, ScopeId,
};
use crate::ty::{Type, TypeContext, TypeId};

/// Arena of all declarations in one compilation session
#[derive(Debug, Default)]
pub struct Program {
    pub types: TypeContext,
    modules: Vec<Module>,
    classes: Vec<Class>,
    functions: Vec<Function>,
    properties: Vec<Property>,
    next_scope: u32,
    /// Marker annotation names the resolution system has agreed to fully
    /// resolve before the query phase
    registered_predicates: FxHashSet<QualifiedName>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    // Modules

    pub fn add_module(&mut self, name: impl Into<String>, platform: PlatformKind) -> ModuleId {
        let id = ModuleId::new(self.modules.len() as u32);
        self.modules.push(Module {
            name: name.into(),
            platform,
        });
        id
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.as_u32() as usize]
    }

    /// Platform category of the module a class is declared in
    pub fn platform_of(&self, class: ClassId) -> PlatformKind {
        self.module(self.class(class).module).platform
    }

    // Classes

    /// Register a class; a fresh member scope is allocated for it
    pub fn add_class(&mut self, mut class: Class) -> ClassId {
        if class.member_scope.is_none() {
            class.member_scope = Some(ScopeId::new(self.next_scope));
            self.next_scope += 1;
        }
        let id = ClassId::new(self.classes.len() as u32);
        self.classes.push(class);
        id
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.as_u32() as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.as_u32() as usize]
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len() as u32).map(ClassId::new)
    }

    /// Resolve a qualified class name to its declaration
    pub fn resolve_class(&self, name: &QualifiedName) -> Option<ClassId> {
        self.class_ids().find(|&id| &self.class(id).name == name)
    }

    // Functions

    /// Register a function; member functions are appended to their owner's
    /// declared list
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(self.functions.len() as u32);
        let owner = function.owner;
        self.functions.push(function);
        if let Some(owner) = owner {
            self.class_mut(owner).functions.push(id);
        }
        id
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.as_u32() as usize]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
        &mut self.functions[id.as_u32() as usize]
    }

    pub fn function_ids(&self) -> impl Iterator<Item = FunctionId> + '_ {
        (0..self.functions.len() as u32).map(FunctionId::new)
    }

    /// Member functions declared directly in a class (not inherited)
    pub fn declared_functions(&self, class: ClassId) -> &[FunctionId] {
        &self.class(class).functions
    }

    /// Resolve a package-qualified name to the matching top-level functions
    pub fn resolve_top_level_functions(&self, package: &str, name: &str) -> Vec<FunctionId> {
        self.function_ids()
            .filter(|&id| {
                let f = self.function(id);
                f.owner.is_none() && f.package.as_deref() == Some(package) && f.name == name
            })
            .collect()
    }

    // Properties

    pub fn add_property(&mut self, property: Property) -> PropertyId {
        let id = PropertyId::new(self.properties.len() as u32);
        let owner = property.owner;
        self.properties.push(property);
        if let Some(owner) = owner {
            self.class_mut(owner).properties.push(id);
        }
        id
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.as_u32() as usize]
    }

    pub fn property_mut(&mut self, id: PropertyId) -> &mut Property {
        &mut self.properties[id.as_u32() as usize]
    }

    pub fn property_ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        (0..self.properties.len() as u32).map(PropertyId::new)
    }

    // Hierarchy

    /// All superclasses of a class, transitively, nearest first
    pub fn super_classes(&self, class: ClassId) -> Vec<ClassId> {
        let mut result = Vec::new();
        let mut work = vec![class];
        while let Some(current) = work.pop() {
            for &sup_ty in &self.class(current).supertypes {
                if let Some(Type::Class { class: sup, .. }) = self.types.get(sup_ty) {
                    if !result.contains(sup) {
                        result.push(*sup);
                        work.push(*sup);
                    }
                }
            }
        }
        result
    }

    /// Supertype declarations a function overrides, by name
    ///
    /// Candidates are same-named member functions declared in any supertype
    /// of the function's owner. Signature comparison is left to the caller.
    pub fn overridden_functions(&self, function: FunctionId) -> Vec<FunctionId> {
        let f = self.function(function);
        let owner = match f.owner {
            Some(owner) => owner,
            None => return Vec::new(),
        };

        self.super_classes(owner)
            .iter()
            .flat_map(|&sup| self.declared_functions(sup).iter().copied())
            .filter(|&g| self.function(g).name == f.name)
            .collect()
    }

    // Predicate registration

    /// Declare the marker annotation names whose arguments must be fully
    /// resolved before the declaration query phase runs
    pub fn register_annotation_predicates<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = QualifiedName>,
    {
        self.registered_predicates.extend(names);
    }

    pub fn is_predicate_registered(&self, name: &QualifiedName) -> bool {
        self.registered_predicates.contains(name)
    }
}
