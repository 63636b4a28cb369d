//! # relocatable-instructions
//! In-memory records for decoded machine instructions, with the displacement
//! arithmetic needed to relocate branches when code is copied to a new
//! address (e.g. during hook trampoline construction).
#![cfg_attr(not(test), no_std)]

/// Contains all declarations that are exposed to library users.
pub mod api {

    /// The errors that can occur when constructing or relocating an instruction.
    pub mod errors {
        pub mod instruction_error;
    }

    /// Traits implemented by consumers.
    pub mod traits {
        pub mod uid_allocator;
    }

    pub mod default_uid_allocator;
    pub mod displacement;
    pub mod instruction;
    pub mod instruction_list;
}

/// Helper functions for the library.
pub mod helpers {
    pub mod relative_displacement;
}
