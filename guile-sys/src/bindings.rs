#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

/// A Guile value: one tagged machine word, laid out exactly like libguile's `SCM`.
///
/// Nothing about the value is checked here. Whether it is a pair, a smob or an immediate is known
/// only by its tag, and the accessors in this crate trust the caller on that.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(transparent)]
pub struct SCM(*mut ());

unsafe impl Send for SCM {}
unsafe impl Sync for SCM {}

impl SCM {
    /// Reinterpret a raw word as a value. Mirrors `SCM_PACK`.
    pub const fn pack(bits: usize) -> Self {
        SCM(bits as _)
    }
}

// Immediates for the Guile 3.0 tag layout, `SCM_MAKIFLAG_BITS(n)`. The tests check these against
// the C side, so a header/library mismatch shows up there.
pub const SCM_BOOL_F: SCM = SCM::pack(0x004);
pub const SCM_ELISP_NIL: SCM = SCM::pack(0x104);
pub const SCM_EOL: SCM = SCM::pack(0x304);
pub const SCM_BOOL_T: SCM = SCM::pack(0x404);
pub const SCM_UNSPECIFIED: SCM = SCM::pack(0x804);
pub const SCM_UNDEFINED: SCM = SCM::pack(0x904);

/// `enum scm_keyword_arguments_flags` from keywords.h
pub const SCM_ALLOW_OTHER_KEYS: ::std::os::raw::c_int = 1 << 0;
pub const SCM_ALLOW_NON_KEYWORD_ARGUMENTS: ::std::os::raw::c_int = 1 << 1;
