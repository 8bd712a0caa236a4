use std::collections::HashMap;

use unicase::UniCase;

/// Macro definitions from `@string{name = value}` directives.
///
/// Names are case-insensitive, so `@string{ACM = ...}` is also found as `acm`. Values are stored
/// after conversion, so expanding a macro is a plain lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroDictionary {
    map: HashMap<UniCase<String>, String>,
}

impl MacroDictionary {
    /// A dictionary holding the month macros, `jan` = `January` through `dec` = `December`.
    pub fn with_month_macros() -> Self {
        let mut macros = Self::default();
        macros.set_month_macros();
        macros
    }

    /// Set the month macros, overriding any existing definitions with the same names.
    pub fn set_month_macros(&mut self) {
        macro_rules! ins {
            ($var:expr, $text:expr) => {
                self.insert($var, $text);
            };
        }

        ins!("jan", "January");
        ins!("feb", "February");
        ins!("mar", "March");
        ins!("apr", "April");
        ins!("may", "May");
        ins!("jun", "June");
        ins!("jul", "July");
        ins!("aug", "August");
        ins!("sep", "September");
        ins!("oct", "October");
        ins!("nov", "November");
        ins!("dec", "December");
    }

    /// Define a macro, returning the previous definition if there was one.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.map.insert(UniCase::new(name.into()), value.into())
    }

    /// Add every definition of `other`, replacing definitions with the same names.
    pub fn extend(&mut self, other: MacroDictionary) {
        self.map.extend(other.map);
    }

    /// Look up a macro by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&UniCase::new(name.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
