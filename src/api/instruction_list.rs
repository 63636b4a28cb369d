extern crate alloc;
use crate::api::instruction::Instruction;
use alloc::vec::Vec;
use core::fmt;
use derive_more::{Deref, DerefMut, From};

/// A decoded instruction sequence, one record per instruction, in address
/// order as produced by the disassembler.
///
/// Displays as one diagnostic line per instruction; rendering is pure and
/// restartable, with no state beyond input position.
///
/// # Example
///
/// ```
/// use relocatable_instructions::api::default_uid_allocator::AtomicUidAllocator;
/// use relocatable_instructions::api::instruction::Instruction;
/// use relocatable_instructions::api::instruction_list::InstructionList;
///
/// let allocator = AtomicUidAllocator::new();
/// let list = InstructionList::from(vec![
///     Instruction::new(0x1000, &[0x90], "nop", "", &allocator),
///     Instruction::new(0x1001, &[0xC3], "ret", "", &allocator),
/// ]);
/// assert_eq!(list.len(), 2);
/// println!("{}", list);
/// ```
#[derive(Debug, Clone, Default, Deref, DerefMut, From)]
pub struct InstructionList(pub Vec<Instruction>);

impl fmt::Display for InstructionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.0 {
            writeln!(f, "{}", instruction)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::default_uid_allocator::AtomicUidAllocator;
    use crate::api::displacement::Displacement;

    #[test]
    fn renders_one_line_per_instruction_in_order() {
        let allocator = AtomicUidAllocator::new();
        let list = InstructionList::from(vec![
            Instruction::new(0x1000, &[0x90], "nop", "", &allocator),
            Instruction::with_displacement(
                0x1001,
                Displacement::Relative(0x10),
                1,
                &[0xE9, 0x10, 0x00, 0x00, 0x00],
                "jmp",
                "0x1016",
                &allocator,
            )
            .unwrap(),
        ]);

        let rendered = list.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1000 [1]: 90"));
        assert!(lines[1].starts_with("1001 [5]: e9 10 00 00 00"));
        assert!(lines[1].ends_with("-> 1016"));
    }

    #[test]
    fn derefs_to_the_underlying_vec() {
        let allocator = AtomicUidAllocator::new();
        let mut list = InstructionList::default();
        assert!(list.is_empty());

        list.push(Instruction::new(0x1000, &[0xC3], "ret", "", &allocator));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].mnemonic(), "ret");
    }
}
