/// Computes the displacement a relative branch at `from`, of encoded length
/// `ins_size`, must carry to reach `to`.
///
/// This is the canonical relocation formula: the result always equals
/// `to - from - ins_size` as a signed value, including when `to` is far below
/// `from`. All arithmetic wraps, so address pairs anywhere in the 64-bit
/// space produce the same signed answer.
///
/// # Parameters
/// - `from`: The address of the branch instruction.
/// - `to`: The address the branch must reach.
/// - `ins_size`: Number of bytes the branch instruction occupies.
///
/// # Example
///
/// ```
/// use relocatable_instructions::helpers::relative_displacement::calculate_relative_displacement;
///
/// // jmp at 0x2000, 5 bytes, back to 0x1015
/// assert_eq!(calculate_relative_displacement(0x2000, 0x1015, 5), -0xFF0);
/// ```
#[inline]
pub fn calculate_relative_displacement(from: u64, to: u64, ins_size: usize) -> i64 {
    to.wrapping_sub(from).wrapping_sub(ins_size as u64) as i64
}

/// Returns `true` if `value` round-trips through a little-endian,
/// sign-extended encoding of `width` bytes.
#[inline]
pub fn relative_fits_in_width(value: i64, width: usize) -> bool {
    if width >= 8 {
        return true;
    }
    if width == 0 {
        return false;
    }

    let bits = width as u32 * 8;
    let min = -(1_i64 << (bits - 1));
    let max = (1_i64 << (bits - 1)) - 1;
    (min..=max).contains(&value)
}

/// Returns `true` if `value` round-trips through a little-endian,
/// zero-extended encoding of `width` bytes.
#[inline]
pub fn absolute_fits_in_width(value: u64, width: usize) -> bool {
    if width >= 8 {
        return true;
    }
    if width == 0 {
        return false;
    }

    value < (1_u64 << (width as u32 * 8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    // Forward branch.
    #[case(0x1000, 0x1015, 5, 0x10)]
    // Branch to the following instruction.
    #[case(0x1000, 0x1005, 5, 0)]
    // Backward branch, target below `from` by more than the instruction size.
    #[case(0x2000, 0x1015, 5, -0xFF0)]
    // Backward branch to self.
    #[case(0x1000, 0x1000, 2, -2)]
    // Large magnitudes, both directions.
    #[case(0x7FFF_FFFF_0000, 0x1000, 5, 0x1000 - 0x7FFF_FFFF_0000 - 5)]
    #[case(0x1000, 0x7FFF_FFFF_0000, 5, 0x7FFF_FFFF_0000 - 0x1000 - 5)]
    // Wrap through the top of the address space.
    #[case(u64::MAX - 0xF, 0, 2, 0xE)]
    fn matches_signed_subtraction(
        #[case] from: u64,
        #[case] to: u64,
        #[case] ins_size: usize,
        #[case] expected: i64,
    ) {
        assert_eq!(calculate_relative_displacement(from, to, ins_size), expected);
    }

    #[rstest]
    #[case(127, 1, true)]
    #[case(128, 1, false)]
    #[case(-128, 1, true)]
    #[case(-129, 1, false)]
    #[case(i32::MAX as i64, 4, true)]
    #[case(i32::MAX as i64 + 1, 4, false)]
    #[case(i32::MIN as i64, 4, true)]
    #[case(i32::MIN as i64 - 1, 4, false)]
    #[case(i64::MAX, 8, true)]
    #[case(i64::MIN, 8, true)]
    #[case(0, 0, false)]
    fn relative_width_check(#[case] value: i64, #[case] width: usize, #[case] expected: bool) {
        assert_eq!(relative_fits_in_width(value, width), expected);
    }

    #[rstest]
    #[case(0xFF, 1, true)]
    #[case(0x100, 1, false)]
    #[case(0xFFFF_FFFF, 4, true)]
    #[case(0x1_0000_0000, 4, false)]
    #[case(u64::MAX, 8, true)]
    #[case(0, 0, false)]
    fn absolute_width_check(#[case] value: u64, #[case] width: usize, #[case] expected: bool) {
        assert_eq!(absolute_fits_in_width(value, width), expected);
    }
}
