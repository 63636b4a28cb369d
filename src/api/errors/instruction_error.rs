use thiserror_no_std::Error;

/// Errors that can occur when constructing or relocating an instruction record.
///
/// All of these are recoverable by the caller; a relocation engine that hits
/// [`InstructionError::DisplacementOverflow`] would typically fall back to an
/// absolute or indirect branch encoding instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InstructionError {
    /// The displacement offset does not lie within the instruction bytes.
    ///
    /// Parameters: (displacement_offset, instruction_length)
    #[error("Displacement offset {0:?} is out of bounds for an instruction of {1:?} bytes")]
    InvalidInstructionEncoding(usize, usize),

    /// A displacement was read or resolved on an instruction that has none.
    #[error("Instruction has no displacement")]
    NoDisplacement,

    /// The displacement does not fit the bytes that encode it.
    /// For absolute displacements the value holds the raw bits, reinterpreted.
    ///
    /// Parameters: (displacement, encoded_width_in_bytes)
    #[error("Displacement {0:?} does not fit in {1:?} bytes")]
    DisplacementOverflow(i64, usize),
}
