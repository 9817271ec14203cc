use crate::source::Span;
use crate::value::RuntimeVal;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

// --- Environment Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("Cannot declare variable '{0}' twice in the same scope")]
    DuplicateDeclaration(String, Span), // Name, span of the declaration site
    #[error("Cannot resolve '{0}', as it does not exist")]
    UnresolvedVariable(String, Span), // Name, span where lookup happened
    #[error("Scope {0:?} does not belong to this environment")]
    UnknownScope(ScopeId, Span), // Id outside the arena, span of the declaration site
}

// --- Environment Definition ---

/// Index of a scope inside an [`Environment`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The root scope every environment starts with.
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: HashMap<String, RuntimeVal>,
}

/// An arena of lexical scopes. Children point at their parent by index and
/// parents never know their children, so scopes can be created from any
/// call frame without borrowing one another.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment holding only an empty global scope.
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    /// Global scope with the built-in bindings a REPL expects.
    pub fn new_global_populated() -> Self {
        let mut env = Environment::new();
        env.scopes[0].bindings.insert("null".to_string(), RuntimeVal::Null);
        env
    }

    /// Creates a new scope enclosed within `parent`.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: HashMap::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.0).and_then(|frame| frame.parent)
    }

    /// Declares `name` in `scope` only. Parent scopes are not consulted, so
    /// shadowing an outer binding is always allowed. A `scope` this arena
    /// does not hold fails with `UnknownScope`.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: RuntimeVal,
        span: Span,
    ) -> Result<RuntimeVal, EnvError> {
        let Some(frame) = self.scopes.get_mut(scope.0) else {
            return Err(EnvError::UnknownScope(scope, span));
        };
        let bindings = &mut frame.bindings;
        if bindings.contains_key(name) {
            return Err(EnvError::DuplicateDeclaration(name.to_string(), span));
        }
        bindings.insert(name.to_string(), value);
        Ok(value)
    }

    /// Finds the nearest scope, starting at `scope` and walking outward,
    /// whose own bindings contain `name`. A scope id missing from the arena
    /// ends the chain like a scope without a parent.
    pub fn resolve(&self, scope: ScopeId, name: &str, span: Span) -> Result<ScopeId, EnvError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(frame) = self.scopes.get(id.0) else {
                break;
            };
            if frame.bindings.contains_key(name) {
                return Ok(id);
            }
            current = frame.parent;
        }
        Err(EnvError::UnresolvedVariable(name.to_string(), span))
    }

    /// Resolves `name` and reads its value.
    pub fn lookup(&self, scope: ScopeId, name: &str, span: Span) -> Result<RuntimeVal, EnvError> {
        let owner = self.resolve(scope, name, span)?;
        self.scopes
            .get(owner.0)
            .and_then(|frame| frame.bindings.get(name))
            .copied()
            .ok_or_else(|| EnvError::UnresolvedVariable(name.to_string(), span))
    }

    /// Overwrites an existing binding in the scope that `resolve` finds.
    /// Never creates a binding.
    pub fn assign(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: RuntimeVal,
        span: Span,
    ) -> Result<RuntimeVal, EnvError> {
        let owner = self.resolve(scope, name, span)?;
        match self.scopes.get_mut(owner.0) {
            Some(frame) => {
                frame.bindings.insert(name.to_string(), value);
                Ok(value)
            }
            None => Err(EnvError::UnresolvedVariable(name.to_string(), span)),
        }
    }

    /// Every name visible from `scope`, shadowed names included once.
    pub fn identifiers(&self, scope: ScopeId) -> HashSet<String> {
        let mut identifiers = HashSet::new();
        let mut current = Some(scope);
        while let Some(frame) = current.and_then(|id| self.scopes.get(id.0)) {
            identifiers.extend(frame.bindings.keys().cloned());
            current = frame.parent;
        }
        identifiers
    }
}
