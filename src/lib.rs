//! Checked Rust access to GNU Guile values.
//!
//! `guile-sys` gives every libguile macro we need a linkable symbol and otherwise checks nothing:
//! `rust_car` on a non-pair or `rust_smob_data` on a non-smob is undefined behaviour. This crate
//! puts the tag checks in front of those calls ([`Value`], [`SmobTag`]), handles entering guile
//! mode ([`with_guile`], [`init_thread`]), defining procedures ([`define_fn`]) and rooting values
//! stored outside the stack ([`ProtectedScm`]).
//!
//! Functions that allocate or run Scheme code are `unsafe` and require the calling thread to be in
//! guile mode. Tag checks and the immediate constants are safe.

mod debug;
mod utils;

pub mod error;
mod guile;
mod keyword;
mod smob;
mod value;

pub use guile_sys;

pub use error::{ArityMismatch, GuileExit, InvalidName, NotAChar, NotAPair, WrongSmobType};
pub use guile::{
    define_fn, eval, init_thread, with_guile, ProtectedScm, ScmFn0, ScmFn1, ScmFn2, ScmFn3, ScmFn4,
    ScmString, Subr, ToScm,
};
pub use keyword::KeywordFlags;
pub use utils::reentry;
pub use smob::{SmobData, SmobTag};
pub use value::{ListIter, Value};
