//! Thread introspection: enumeration and register capture

pub mod enumerator;
pub mod registers;

pub use enumerator::{find_main_thread, threads_owned_by, ThreadEnumerator};
pub use registers::ThreadRegisterReader;
