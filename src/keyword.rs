//! Keyword arguments for procedures written in Rust.
use bitflags::bitflags;
use std::os::raw::c_int;

use guile_sys::scm_t_keyword_arguments_flags;

bitflags! {
    /// How `scm_c_bind_keyword_arguments` treats the rest list.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct KeywordFlags: c_int {
        /// Ignore keywords that weren't asked for instead of throwing.
        const ALLOW_OTHER_KEYS = guile_sys::SCM_ALLOW_OTHER_KEYS;
        /// Skip over positional arguments mixed in with the keywords.
        const ALLOW_NON_KEYWORD_ARGUMENTS = guile_sys::SCM_ALLOW_NON_KEYWORD_ARGUMENTS;
    }
}

impl KeywordFlags {
    pub fn as_raw(self) -> scm_t_keyword_arguments_flags {
        self.bits() as scm_t_keyword_arguments_flags
    }
}

/// Pull keyword arguments out of a rest list, like `#:key` in `define*`.
///
/// Expands to a tuple with one [`Value`](crate::Value) per keyword, in order; keywords that were
/// not passed come back as [`Value::undefined`](crate::Value::undefined). Must be used inside
/// `unsafe` in guile mode, and guile throws on a malformed rest list.
///
/// ```ignore
/// let (start, end) = bind_keywords!("substring*", rest, KeywordFlags::empty(), "start", "end");
/// ```
#[macro_export]
macro_rules! bind_keywords {
    (@undefined $keyword:literal) => {
        $crate::Value::undefined()
    };
    (@bind $subr:literal, $rest:expr, $flags:expr, $out:ident, [], [$( $keyword:literal => $idx:tt ),*], [$( $unused:tt )*]) => {
        $crate::guile_sys::scm_c_bind_keyword_arguments(
            concat!($subr, "\0").as_ptr().cast(),
            $crate::Value::raw($rest),
            $crate::KeywordFlags::as_raw($flags),
            $(
                $crate::guile_sys::scm_from_utf8_keyword(concat!($keyword, "\0").as_ptr().cast()),
                $out.$idx.as_mut_ptr(),
            )*
            $crate::guile_sys::SCM_UNDEFINED,
        )
    };
    // pair each keyword with the next tuple index
    (@bind $subr:literal, $rest:expr, $flags:expr, $out:ident, [$next:literal $(, $keyword:literal )*], [$( $done:literal => $didx:tt ),*], [$idx:tt $( $more:tt )*]) => {
        $crate::bind_keywords!(@bind $subr, $rest, $flags, $out, [$( $keyword ),*], [$( $done => $didx, )* $next => $idx], [$( $more )*])
    };
    ($subr:literal, $rest:expr, $flags:expr, $( $keyword:literal ),+ $(,)?) => {{
        let mut out = ( $( $crate::bind_keywords!(@undefined $keyword), )+ );
        $crate::bind_keywords!(@bind $subr, $rest, $flags, out, [$( $keyword ),+], [], [0 1 2 3 4 5 6 7 8 9 10 11]);
        out
    }};
}
