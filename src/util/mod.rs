//! Utility modules for xmlsmith.
//!
//! Contains the character and name legality checks and the escaping
//! functions used at render time. Both are pure string functions with no
//! knowledge of the tree.

pub mod chars;
pub mod escape;
