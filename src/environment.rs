use crate::error::LoxError;
use crate::lexer::Token;
use crate::value::Value;
use std::collections::HashMap;

pub type ScopeId = usize;

#[derive(Debug)]
struct Scope {
    values: HashMap<String, Value>,
    parent: Option<ScopeId>,
}

/// Lexical scope chain stored as an arena of scope records. The interpreter
/// holds the current scope handle; entering a block pushes a child scope and
/// leaving restores the previous handle, so the arena outlives every handle
/// taken during one interpret call.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                values: HashMap::new(),
                parent: None,
            }],
            current: 0,
        }
    }

    /// Creates a child of the current scope, makes it current, and returns
    /// the handle to restore on block exit.
    pub fn push_scope(&mut self) -> ScopeId {
        let previous = self.current;
        self.scopes.push(Scope {
            values: HashMap::new(),
            parent: Some(previous),
        });
        self.current = self.scopes.len() - 1;
        previous
    }

    /// Restores the previous scope handle. Blocks nest strictly, so the
    /// abandoned scope sits at the top of the arena and can be reclaimed;
    /// without this a long REPL session would accumulate one dead scope
    /// record per executed block.
    pub fn pop_scope(&mut self, previous: ScopeId) {
        if self.current > previous && self.current == self.scopes.len() - 1 {
            self.scopes.pop();
        }
        self.current = previous;
    }

    /// Defines a binding in the innermost scope. Unlike `assign`,
    /// re-declaration of an existing name is permitted.
    pub fn define(&mut self, name: &str, value: Value) {
        self.scopes[self.current]
            .values
            .insert(name.to_string(), value);
    }

    /// Looks a name up through the scope chain, innermost first.
    pub fn get(&self, name: &Token) -> Result<Value, LoxError> {
        let mut scope = Some(self.current);

        while let Some(id) = scope {
            if let Some(value) = self.scopes[id].values.get(&name.lexeme) {
                return Ok(value.clone());
            }
            scope = self.scopes[id].parent;
        }

        Err(LoxError::undefined_variable(name))
    }

    /// Rebinds an existing name, walking outward through the chain. Never
    /// creates a binding: assigning to an undefined name is an error.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), LoxError> {
        let mut scope = Some(self.current);

        while let Some(id) = scope {
            if self.scopes[id].values.contains_key(&name.lexeme) {
                self.scopes[id].values.insert(name.lexeme.clone(), value);
                return Ok(());
            }
            scope = self.scopes[id].parent;
        }

        Err(LoxError::undefined_variable(name))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popped_scopes_are_reclaimed() {
        let mut env = Environment::new();

        for _ in 0..10 {
            let previous = env.push_scope();
            env.define("x", Value::Number(1.0));
            env.pop_scope(previous);
        }

        // Only the global scope remains; repeated blocks must not grow the arena
        assert_eq!(env.scopes.len(), 1);
        assert_eq!(env.current, 0);
    }

    #[test]
    fn nested_scopes_unwind_in_order() {
        let mut env = Environment::new();

        let outer = env.push_scope();
        let inner = env.push_scope();
        assert_eq!(env.scopes.len(), 3);

        env.pop_scope(inner);
        assert_eq!(env.scopes.len(), 2);

        env.pop_scope(outer);
        assert_eq!(env.scopes.len(), 1);
        assert_eq!(env.current, 0);
    }

    #[test]
    fn global_scope_is_never_reclaimed() {
        let mut env = Environment::new();
        env.pop_scope(0);
        assert_eq!(env.scopes.len(), 1);
    }
}
