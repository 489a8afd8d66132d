use std::fmt;

/// Renders as `path:line:column`, which editors and terminals can jump to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loc<'a> {
    pub path: &'a str,
    pub line: usize,
    pub column: usize,
}

impl<'a> fmt::Display for Loc<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// `eprintln!` prefixed with a [`Loc`]: `diagf!(at loc, ...)`, or the
/// caller's own file and line when `at` is left out.
#[macro_export]
macro_rules! diagf {
    (at $loc:expr, $fmt:expr $(, $args:expr)*) => {{
        eprintln!("{}: {}", $loc, format_args!($fmt $(, $args)*));
    }};
    ($fmt:expr $(, $args:expr)*) => {{
        let inferred_loc = $crate::utils::core::Loc {
            path: file!(),
            line: line!() as usize,
            column: 1,
        };
        eprintln!("{}: {}", inferred_loc, format_args!($fmt $(, $args)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loc_display() {
        let loc = Loc {
            path: "src/App.tsx",
            line: 812,
            column: 17,
        };
        assert_eq!(loc.to_string(), "src/App.tsx:812:17");
    }

    #[test]
    fn test_diagf_explicit_loc() {
        let my_loc = Loc {
            path: "src/App.tsx",
            line: 100,
            column: 25,
        };

        diagf!(at my_loc, "offset {} lands here", 27893);
    }

    #[test]
    fn test_diagf_inferred_loc() {
        diagf!("Inferred loc: Just a general message here.");
        diagf!("Inferred loc: Value is {}", 42);
    }
}
