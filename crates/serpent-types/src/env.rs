//! The two-tier symbol table: whole-program declarations and local scopes.

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use serpent_ast::{FunDef, Program, Type};
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Name of the constructor method.
pub const INIT_METHOD: &str = "__init__";

/// The builtin whose result takes the type of its argument.
pub const PRINT_BUILTIN: &str = "print";

/// Parameter types (receiver included for methods) and return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSig {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl FuncSig {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self { params, ret }
    }

    fn of<A>(fun: &FunDef<A>) -> Self {
        Self {
            params: fun.params.iter().map(|p| p.ty.clone()).collect(),
            ret: fun.return_type.clone(),
        }
    }
}

/// A class's own fields and methods. There is no inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassInfo {
    pub fields: IndexMap<SmolStr, Type>,
    pub methods: IndexMap<SmolStr, FuncSig>,
}

impl ClassInfo {
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields.get(name)
    }

    pub fn method(&self, name: &str) -> Option<&FuncSig> {
        self.methods.get(name)
    }

    pub fn constructor(&self) -> Option<&FuncSig> {
        self.methods.get(INIT_METHOD)
    }
}

/// Whole-program declarations.
///
/// Every update returns a new environment; the receiver is left as it was,
/// so a caller can keep an earlier revision and retry from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalEnv {
    globals: IndexMap<SmolStr, Type>,
    functions: IndexMap<SmolStr, FuncSig>,
    classes: IndexMap<SmolStr, ClassInfo>,
}

impl Default for GlobalEnv {
    /// The environment seeded with the builtin functions.
    fn default() -> Self {
        let mut env = Self::empty();
        for (name, params) in [
            ("abs", vec![Type::Num]),
            ("max", vec![Type::Num, Type::Num]),
            ("min", vec![Type::Num, Type::Num]),
            ("pow", vec![Type::Num, Type::Num]),
            (PRINT_BUILTIN, vec![Type::object()]),
        ] {
            env.functions
                .insert(SmolStr::new(name), FuncSig::new(params, Type::Num));
        }
        env
    }
}

impl GlobalEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment without builtins.
    pub fn empty() -> Self {
        Self {
            globals: IndexMap::new(),
            functions: IndexMap::new(),
            classes: IndexMap::new(),
        }
    }

    pub fn global(&self, name: &str) -> Option<&Type> {
        self.globals.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&FuncSig> {
        self.functions.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn globals(&self) -> impl Iterator<Item = (&SmolStr, &Type)> {
        self.globals.iter()
    }

    pub fn function_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.functions.keys()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.classes.keys()
    }

    pub fn with_global(&self, name: impl Into<SmolStr>, ty: Type) -> Self {
        let mut env = self.clone();
        env.globals.insert(name.into(), ty);
        env
    }

    pub fn with_function(&self, name: impl Into<SmolStr>, sig: FuncSig) -> Self {
        let mut env = self.clone();
        env.functions.insert(name.into(), sig);
        env
    }

    /// Adds every binding yielded by `bindings` to the globals.
    pub fn with_globals(&self, bindings: impl IntoIterator<Item = (SmolStr, Type)>) -> Self {
        let mut env = self.clone();
        env.globals.extend(bindings);
        env
    }

    /// Adds the declarations of `program`: variable types, function
    /// signatures, and class fields and methods.
    ///
    /// A declaration replaces any earlier one with the same name.
    pub fn extend<A>(&self, program: &Program<A>) -> Self {
        let mut env = self.clone();

        for init in &program.var_inits {
            env.globals
                .insert(init.var.name.node.clone(), init.var.ty.clone());
        }

        for fun in &program.fun_defs {
            env.functions.insert(fun.name.node.clone(), FuncSig::of(fun));
        }

        for class in &program.classes {
            let info = ClassInfo {
                fields: class
                    .fields
                    .iter()
                    .map(|f| (f.var.name.node.clone(), f.var.ty.clone()))
                    .collect(),
                methods: class
                    .methods
                    .iter()
                    .map(|m| (m.name.node.clone(), FuncSig::of(m)))
                    .collect(),
            };
            env.classes.insert(class.name.node.clone(), info);
        }

        env
    }
}

/// Bindings of one function body or top-level block.
#[derive(Debug, Clone)]
pub struct LocalScope {
    vars: FxIndexMap<SmolStr, Type>,
    expected_return: Type,
    is_top_level: bool,
}

impl LocalScope {
    pub fn top_level() -> Self {
        Self {
            vars: FxIndexMap::default(),
            expected_return: Type::None,
            is_top_level: true,
        }
    }

    pub fn function(expected_return: Type) -> Self {
        Self {
            vars: FxIndexMap::default(),
            expected_return,
            is_top_level: false,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.vars.get(name)
    }

    pub fn bind(&mut self, name: impl Into<SmolStr>, ty: Type) {
        self.vars.insert(name.into(), ty);
    }

    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.vars.keys()
    }

    pub fn expected_return(&self) -> &Type {
        &self.expected_return
    }

    pub fn is_top_level(&self) -> bool {
        self.is_top_level
    }

    pub fn into_bindings(self) -> impl Iterator<Item = (SmolStr, Type)> {
        self.vars.into_iter()
    }
}
