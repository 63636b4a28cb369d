use derive_more::From;

/// The displacement carried by a branch or call style instruction: the value
/// that makes the instruction point somewhere.
///
/// A relative displacement is applied from the address of the *next*
/// instruction (eip/rip semantics); an absolute displacement is the raw
/// target address.
///
/// # Example
///
/// ```
/// use relocatable_instructions::api::displacement::Displacement;
///
/// let disp: Displacement = 0x10_i64.into();
/// assert!(disp.is_relative());
/// assert_eq!(disp.as_relative(), Some(0x10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, From)]
pub enum Displacement {
    /// Signed offset from the end of the instruction.
    Relative(i64),

    /// Raw target address.
    Absolute(u64),
}

impl Displacement {
    /// True if this displacement is relative to the instruction's address.
    pub fn is_relative(&self) -> bool {
        matches!(self, Displacement::Relative(_))
    }

    /// The signed offset, if this displacement is relative.
    pub fn as_relative(&self) -> Option<i64> {
        match self {
            Displacement::Relative(value) => Some(*value),
            Displacement::Absolute(_) => None,
        }
    }

    /// The raw target address, if this displacement is absolute.
    pub fn as_absolute(&self) -> Option<u64> {
        match self {
            Displacement::Relative(_) => None,
            Displacement::Absolute(value) => Some(*value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_signed_is_relative() {
        let disp = Displacement::from(-5_i64);
        assert!(disp.is_relative());
        assert_eq!(disp.as_relative(), Some(-5));
        assert_eq!(disp.as_absolute(), None);
    }

    #[test]
    fn from_unsigned_is_absolute() {
        let disp = Displacement::from(0xDEADBEEF_u64);
        assert!(!disp.is_relative());
        assert_eq!(disp.as_absolute(), Some(0xDEADBEEF));
        assert_eq!(disp.as_relative(), None);
    }
}
