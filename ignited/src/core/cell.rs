//! Heterogeneous table cells and their text rendering.

use std::borrow::Cow;
use std::fmt;

/// One cell of an output row.
///
/// The variant decides how the cell is rendered, in this priority order:
/// self-describing values use their `Display` form, text is used as-is,
/// integers render in base 10, and anything else falls back to `Debug`.
#[derive(Clone, Copy)]
pub enum Cell<'a> {
    Described(&'a dyn fmt::Display),
    Text(&'a str),
    Int(i64),
    Opaque(&'a dyn fmt::Debug),
}

impl<'a> Cell<'a> {
    /// Cell for a value that knows how to describe itself.
    pub fn described(value: &'a dyn fmt::Display) -> Self {
        Cell::Described(value)
    }

    /// Cell for a value with no display form of its own.
    pub fn opaque(value: &'a dyn fmt::Debug) -> Self {
        Cell::Opaque(value)
    }

    /// Text form of the cell.
    pub fn render(&self) -> Cow<'a, str> {
        match *self {
            Cell::Described(value) => Cow::Owned(value.to_string()),
            Cell::Text(text) => Cow::Borrowed(text),
            Cell::Int(n) => Cow::Owned(n.to_string()),
            Cell::Opaque(value) => Cow::Owned(format!("{value:?}")),
        }
    }
}

impl<'a> From<&'a str> for Cell<'a> {
    fn from(text: &'a str) -> Self {
        Cell::Text(text)
    }
}

impl<'a> From<&'a String> for Cell<'a> {
    fn from(text: &'a String) -> Self {
        Cell::Text(text.as_str())
    }
}

impl From<i64> for Cell<'_> {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl fmt::Debug for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cell").field(&self.render()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Phase;

    impl fmt::Display for Phase {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Running")
        }
    }

    #[derive(Debug)]
    #[allow(dead_code)]
    struct Opaque {
        cpus: u8,
    }

    #[test]
    fn integer_renders_plain_decimal() {
        assert_eq!(Cell::from(42i64).render(), "42");
        assert_eq!(Cell::from(1_000_000i64).render(), "1000000");
        assert_eq!(Cell::from(-7i64).render(), "-7");
    }

    #[test]
    fn text_is_borrowed_verbatim() {
        let cell = Cell::from("alice");
        assert!(matches!(cell.render(), Cow::Borrowed("alice")));
    }

    #[test]
    fn described_uses_display_form() {
        let phase = Phase;
        assert_eq!(Cell::described(&phase).render(), "Running");
    }

    #[test]
    fn opaque_falls_back_to_debug() {
        let value = Opaque { cpus: 2 };
        assert_eq!(Cell::opaque(&value).render(), "Opaque { cpus: 2 }");
    }
}
