extern crate alloc;
use crate::api::displacement::Displacement;
use crate::api::errors::instruction_error::InstructionError;
use crate::api::traits::uid_allocator::{Uid, UidAllocator};
use crate::helpers::relative_displacement::{
    absolute_fits_in_width, calculate_relative_displacement, relative_fits_in_width,
};
use alloc::string::String;
use core::fmt;
use core::fmt::Write;
use core::hash::{Hash, Hasher};
use smallvec::SmallVec;

/// Byte buffer for one instruction encoding. x86/x64 instructions are at
/// most 15 bytes, so records stay off the heap.
pub type InstructionBytes = SmallVec<[u8; 16]>;

/// Column the mnemonic starts at in the diagnostic line.
const BYTE_STREAM_WIDTH: usize = 30;

/// One decoded machine instruction: its current address, exact byte
/// encoding, display strings, and (for branch/call style instructions) the
/// displacement that makes it point somewhere.
///
/// A disassembler constructs these; a relocation engine later changes the
/// address with [`set_address`] and retargets the branch with
/// [`set_destination`], which re-encodes the displacement bytes in the
/// record's private buffer. Nothing here touches executable memory; writing
/// patched bytes into a process is the engine's job.
///
/// Equality is identity equality: two records compare equal only when they
/// share a [`Uid`], never because their fields match. See [`duplicate`],
/// [`assign_from`] and the `Clone` impl for how identity moves (or does not
/// move) between records.
///
/// [`set_address`]: Instruction::set_address
/// [`set_destination`]: Instruction::set_destination
/// [`duplicate`]: Instruction::duplicate
/// [`assign_from`]: Instruction::assign_from
#[derive(Debug, Clone)]
pub struct Instruction {
    /// Address the instruction currently lives at.
    address: u64,

    /// Where the instruction points, when it is a displacement-carrying kind.
    displacement: Option<Displacement>,

    /// Offset into `bytes` where the displacement is encoded.
    displacement_offset: u8,

    /// The raw bytes of this instruction.
    bytes: InstructionBytes,

    mnemonic: String,
    operands: String,

    uid: Uid,
}

impl Instruction {
    /// Creates a record for an instruction that carries no displacement.
    ///
    /// # Parameters
    /// - `address`: Address the instruction was decoded at.
    /// - `bytes`: The instruction's exact encoding.
    /// - `mnemonic`: Short symbol name, e.g. `nop`.
    /// - `operands`: Operand text, display only.
    /// - `allocator`: Identity source for this record.
    pub fn new(
        address: u64,
        bytes: &[u8],
        mnemonic: &str,
        operands: &str,
        allocator: &impl UidAllocator,
    ) -> Self {
        Self {
            address,
            displacement: None,
            displacement_offset: 0,
            bytes: InstructionBytes::from_slice(bytes),
            mnemonic: mnemonic.into(),
            operands: operands.into(),
            uid: allocator.next_uid(),
        }
    }

    /// Creates a record for a branch/call style instruction whose
    /// displacement is encoded at `displacement_offset` within `bytes`.
    ///
    /// # Errors
    ///
    /// [`InstructionError::InvalidInstructionEncoding`] if the offset lies
    /// outside the instruction bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use relocatable_instructions::api::default_uid_allocator::AtomicUidAllocator;
    /// use relocatable_instructions::api::displacement::Displacement;
    /// use relocatable_instructions::api::instruction::Instruction;
    ///
    /// let allocator = AtomicUidAllocator::new();
    /// // jmp +0x10 at 0x1000
    /// let ins = Instruction::with_displacement(
    ///     0x1000,
    ///     Displacement::Relative(0x10),
    ///     1,
    ///     &[0xE9, 0x10, 0x00, 0x00, 0x00],
    ///     "jmp",
    ///     "0x1015",
    ///     &allocator,
    /// )
    /// .unwrap();
    /// assert_eq!(ins.destination().unwrap(), 0x1015);
    /// ```
    pub fn with_displacement(
        address: u64,
        displacement: Displacement,
        displacement_offset: u8,
        bytes: &[u8],
        mnemonic: &str,
        operands: &str,
        allocator: &impl UidAllocator,
    ) -> Result<Self, InstructionError> {
        if displacement_offset as usize >= bytes.len() {
            return Err(InstructionError::InvalidInstructionEncoding(
                displacement_offset as usize,
                bytes.len(),
            ));
        }

        Ok(Self {
            address,
            displacement: Some(displacement),
            displacement_offset,
            bytes: InstructionBytes::from_slice(bytes),
            mnemonic: mnemonic.into(),
            operands: operands.into(),
            uid: allocator.next_uid(),
        })
    }

    /// The address this instruction currently lives at.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Updates the record's notion of where it lives.
    ///
    /// Does not move bytes and does not recompute the displacement; a caller
    /// relocating an instruction follows this with [`Instruction::set_destination`]
    /// to keep the branch pointing at the same logical target.
    pub fn set_address(&mut self, address: u64) {
        self.address = address;
    }

    /// Byte length of the encoded instruction.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// The raw bytes of this instruction, reflecting any displacement
    /// rewrites performed on this record.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Short symbol name of the instruction.
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Operand text, never interpreted by relocation logic.
    pub fn operands(&self) -> &str {
        &self.operands
    }

    /// Symbol name and operands, as shown in diagnostics.
    pub fn full_name(&self) -> String {
        let mut name = String::with_capacity(self.mnemonic.len() + 1 + self.operands.len());
        name.push_str(&self.mnemonic);
        name.push(' ');
        name.push_str(&self.operands);
        name
    }

    /// True for instruction kinds that carry a call/jump style displacement.
    ///
    /// Becomes true as a side effect of either displacement setter and is
    /// never cleared automatically.
    pub fn has_displacement(&self) -> bool {
        self.displacement.is_some()
    }

    /// True if the displacement is relative to the instruction's address.
    /// False for absolute displacements and for instructions without one.
    pub fn is_displacement_relative(&self) -> bool {
        matches!(self.displacement, Some(Displacement::Relative(_)))
    }

    /// The instruction's displacement.
    ///
    /// # Errors
    ///
    /// [`InstructionError::NoDisplacement`] if this instruction kind carries none.
    pub fn displacement(&self) -> Result<Displacement, InstructionError> {
        self.displacement.ok_or(InstructionError::NoDisplacement)
    }

    /// Offset into the instruction bytes where the displacement is encoded.
    pub fn displacement_offset(&self) -> u8 {
        self.displacement_offset
    }

    /// Sets where in the instruction bytes the displacement is encoded.
    ///
    /// # Errors
    ///
    /// [`InstructionError::InvalidInstructionEncoding`] if the offset lies
    /// outside the instruction bytes.
    pub fn set_displacement_offset(&mut self, offset: u8) -> Result<(), InstructionError> {
        if offset as usize >= self.bytes.len() {
            return Err(InstructionError::InvalidInstructionEncoding(
                offset as usize,
                self.bytes.len(),
            ));
        }

        self.displacement_offset = offset;
        Ok(())
    }

    /// Resolves the address this instruction transfers control to.
    ///
    /// Relative displacements are applied from the end of the instruction
    /// (eip/rip semantics); absolute displacements are returned as-is.
    ///
    /// # Errors
    ///
    /// [`InstructionError::NoDisplacement`] if this instruction kind carries none.
    pub fn destination(&self) -> Result<u64, InstructionError> {
        match self.displacement {
            Some(Displacement::Relative(disp)) => Ok(self
                .address
                .wrapping_add(disp as u64)
                .wrapping_add(self.size() as u64)),
            Some(Displacement::Absolute(target)) => Ok(target),
            None => Err(InstructionError::NoDisplacement),
        }
    }

    /// Points the instruction at `destination`, keeping its current
    /// encoding form (relative stays relative, absolute stays absolute).
    ///
    /// Relative displacements are recomputed from the *current* address, so
    /// relocation is [`Instruction::set_address`] followed by this call.
    /// Instructions without a displacement are left untouched; there is
    /// nothing to relocate.
    ///
    /// # Errors
    ///
    /// [`InstructionError::DisplacementOverflow`] if the new displacement
    /// does not fit the bytes that encode it. The record is not modified;
    /// the caller decides whether to widen the branch (e.g. via an absolute
    /// or indirect form) instead.
    pub fn set_destination(&mut self, destination: u64) -> Result<(), InstructionError> {
        let width = self.displacement_width();
        match self.displacement {
            Some(Displacement::Relative(_)) => {
                let disp = calculate_relative_displacement(self.address, destination, self.size());
                if !relative_fits_in_width(disp, width) {
                    return Err(InstructionError::DisplacementOverflow(disp, width));
                }

                self.set_relative_displacement(disp);
                Ok(())
            }
            Some(Displacement::Absolute(_)) => {
                if !absolute_fits_in_width(destination, width) {
                    return Err(InstructionError::DisplacementOverflow(
                        destination as i64,
                        width,
                    ));
                }

                self.set_absolute_displacement(destination);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Sets a relative displacement and re-encodes it into the byte buffer.
    ///
    /// The logical field and the trailing bytes from the displacement offset
    /// are rewritten inside this one call; callers never observe one updated
    /// without the other. The encoding is little-endian, sign-extended or
    /// truncated to exactly `size() - displacement_offset()` bytes — use
    /// [`Instruction::set_destination`] when an overflow check is wanted.
    ///
    /// This only edits the record's private byte copy, never executable memory.
    pub fn set_relative_displacement(&mut self, displacement: i64) {
        self.displacement = Some(Displacement::Relative(displacement));
        self.repack_displacement(displacement as u64, displacement < 0);
    }

    /// Sets an absolute displacement and re-encodes it into the byte buffer.
    ///
    /// Symmetric to [`Instruction::set_relative_displacement`], zero-extended
    /// rather than sign-extended.
    pub fn set_absolute_displacement(&mut self, displacement: u64) {
        self.displacement = Some(Displacement::Absolute(displacement));
        self.repack_displacement(displacement, false);
    }

    /// Identity witness for downstream containers, e.g. as the key of a
    /// [`UidMap`](crate::api::traits::uid_allocator::UidMap) from original
    /// instructions to their relocated counterparts.
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Copies every field of `source` into this record *except* identity;
    /// this record keeps its own [`Uid`], so containers keyed by it keep
    /// tracking this record across the overwrite.
    pub fn assign_from(&mut self, source: &Instruction) {
        self.address = source.address;
        self.displacement = source.displacement;
        self.displacement_offset = source.displacement_offset;
        self.bytes = source.bytes.clone();
        self.mnemonic = source.mnemonic.clone();
        self.operands = source.operands.clone();
    }

    /// Duplicates this record under a fresh identity.
    ///
    /// The copy is an independent instruction that downstream containers
    /// track separately. `Clone`, by contrast, carries the identity over and
    /// yields a record that compares equal to the original; use it only when
    /// alias semantics are wanted.
    pub fn duplicate(&self, allocator: &impl UidAllocator) -> Instruction {
        let mut copy = self.clone();
        copy.uid = allocator.next_uid();
        copy
    }

    /// Number of bytes encoding the displacement: offset through end of buffer.
    fn displacement_width(&self) -> usize {
        self.size().saturating_sub(self.displacement_offset as usize)
    }

    /// Rewrites `bytes[displacement_offset..]` with the little-endian
    /// encoding of `value`, extending past 8 bytes with the sign fill.
    fn repack_displacement(&mut self, value: u64, negative: bool) {
        let le = value.to_le_bytes();
        let fill = if negative { 0xFF } else { 0x00 };
        let offset = self.displacement_offset as usize;

        for (index, byte) in self.bytes[offset..].iter_mut().enumerate() {
            *byte = if index < le.len() { le[index] } else { fill };
        }
    }
}

impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Instruction {}

impl Hash for Instruction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}

impl fmt::Display for Instruction {
    /// Renders one diagnostic line: hex address, bracketed byte count, hex
    /// byte stream padded to a fixed column, mnemonic + operands, and the
    /// resolved destination for relative branches.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut byte_stream = String::with_capacity(BYTE_STREAM_WIDTH);
        for byte in &self.bytes {
            write!(byte_stream, "{:02x} ", byte)?;
        }

        write!(f, "{:x} [{}]: ", self.address, self.size())?;
        write!(f, "{:<width$}", byte_stream, width = BYTE_STREAM_WIDTH)?;
        write!(f, "{}", self.full_name())?;

        if let Some(Displacement::Relative(_)) = self.displacement {
            if let Ok(destination) = self.destination() {
                write!(f, " -> {:x}", destination)?;
            }
        }

        Ok(())
    }
}
