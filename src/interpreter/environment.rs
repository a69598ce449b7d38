use std::collections::HashMap;

/// The single, flat variable scope of a program run.
///
/// Only assignments write to it. Hosts that run several chunks of input in a
/// row can keep one environment alive between them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    variables: HashMap<String, i64>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            variables: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    // Creates the variable or overwrites its previous value
    pub fn assign(&mut self, name: &str, value: i64) {
        if let Some(slot) = self.variables.get_mut(name) {
            *slot = value;
        } else {
            self.variables.insert(name.to_owned(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// All bindings, sorted by name.
    pub fn variables(&self) -> Vec<(&str, i64)> {
        let mut variables: Vec<(&str, i64)> = self.variables.iter().map(|(name, value)| (name.as_str(), *value)).collect();
        variables.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
        variables
    }
}
