use std::fmt;

/// The result of evaluating a node. Numbers and null are the only runtime
/// types; arithmetic on anything but two numbers degrades to `Null`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum RuntimeVal {
    Number(f64),
    #[default]
    Null,
}

impl RuntimeVal {
    pub fn type_name(&self) -> &'static str {
        match self {
            RuntimeVal::Number(_) => "number",
            RuntimeVal::Null => "null",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuntimeVal::Number(n) => Some(*n),
            RuntimeVal::Null => None,
        }
    }
}

impl fmt::Display for RuntimeVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeVal::Number(n) => write!(f, "{}", n),
            RuntimeVal::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(RuntimeVal::Number(14.0).to_string(), "14");
        assert_eq!(RuntimeVal::Number(2.5).to_string(), "2.5");
        assert_eq!(RuntimeVal::Number(f64::INFINITY).to_string(), "inf");
        assert_eq!(RuntimeVal::Null.to_string(), "null");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(RuntimeVal::Number(0.0).type_name(), "number");
        assert_eq!(RuntimeVal::default().type_name(), "null");
        assert_eq!(RuntimeVal::Null.as_number(), None);
    }
}
