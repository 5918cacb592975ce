use std::collections::HashMap;

use lazy_static::lazy_static;

/// A one-argument math function over floats
pub type UnaryFn = fn(f64) -> f64;

lazy_static! {
    static ref FUNCTIONS: HashMap<&'static str, UnaryFn> = {
        let mut m: HashMap<&'static str, UnaryFn> = HashMap::new();
        m.insert("sin", f64::sin);
        m.insert("cos", f64::cos);
        m.insert("tan", f64::tan);
        m.insert("asin", f64::asin);
        m.insert("acos", f64::acos);
        m.insert("atan", f64::atan);
        m.insert("log", f64::log10);
        m.insert("ln", f64::ln);
        m.insert("exp", f64::exp);
        m.insert("sqrt", f64::sqrt);
        m.insert("abs", f64::abs);
        m.insert("floor", f64::floor);
        m.insert("ceil", f64::ceil);
        m
    };
}

/// Looks up a function by name. Name is case-insensitive
pub fn lookup(name: &str) -> Option<UnaryFn> {
    FUNCTIONS.get(name.to_lowercase().as_str()).copied()
}

pub fn is_function(name: &str) -> bool {
    lookup(name).is_some()
}

/// Names of all supported functions in alphabetical order, e.g. for
/// completion in an interactive shell
pub fn function_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = FUNCTIONS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let f = lookup("SQRT").map(|f| f(16.0));
        assert_eq!(f, Some(4.0));
        let f = lookup("log").map(|f| f(1000.0)).unwrap_or(0.0);
        assert!((f - 3.0).abs() < 1e-12);
        let f = lookup("ln").map(|f| f(1.0));
        assert_eq!(f, Some(0.0));
        assert!(lookup("sinh").is_none());
        assert!(!is_function("x"));
    }

    #[test]
    fn test_names() {
        let names = function_names();
        assert_eq!(names.len(), 13);
        assert_eq!(names.first(), Some(&"abs"));
        assert_eq!(names.last(), Some(&"tan"));
    }
}
