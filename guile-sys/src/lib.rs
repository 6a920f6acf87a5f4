//! Raw bindings to GNU Guile.
//!
//! Most of libguile's value accessors are preprocessor macros or inline functions, which can't be
//! linked against. `helpers.c` gives each one we need a real symbol (`rust_car`, `scm_eol`,
//! `rust_new_smob`, ...) and bindgen picks them up from `wrapper.h` along with the rest of the
//! library. Every one of them is a single forwarded expression: no checks, no allocation beyond
//! what the wrapped macro does. The caller must be in guile mode and must have checked the tag
//! of anything it hands to `rust_car`, `rust_cdr` or `rust_smob_data`.
#![allow(
    non_camel_case_types,
    non_upper_case_globals,
    non_snake_case,
    improper_ctypes
)]

mod bindings;
pub use bindings::*;

#[cfg(test)]
mod test {
    use super::*;

    fn enter() {
        unsafe { scm_init_guile() };
    }

    fn truthy(obj: SCM) -> bool {
        obj != unsafe { rust_bool_false() }
    }

    fn new_smob_type(name: &std::ffi::CStr) -> scm_t_bits {
        unsafe { scm_make_smob_type(name.as_ptr(), 0) }
    }

    #[test]
    fn scm_type_is_expected_size() {
        let real_sz = unsafe { rust_sizeof_scm() };
        assert_eq!(std::mem::size_of::<SCM>(), real_sz as usize);
    }

    #[test]
    fn bool_consts_correct() {
        enter();
        let t = unsafe { rust_bool_true() };
        let f = unsafe { rust_bool_false() };
        assert_eq!(t, SCM_BOOL_T);
        assert_eq!(f, SCM_BOOL_F);
        assert_ne!(t, f);
        assert!(truthy(unsafe { scm_eq_p(t, SCM_BOOL_T) }));
        assert!(truthy(unsafe { scm_not(f) }));
        assert!(!truthy(unsafe { scm_not(t) }));
    }

    #[test]
    fn consts_correct() {
        enter();
        assert_eq!(unsafe { rust_unspecified() }, SCM_UNSPECIFIED);
        assert_eq!(unsafe { scm_undefined() }, SCM_UNDEFINED);
        assert_eq!(unsafe { scm_eol() }, SCM_EOL);
        assert_eq!(unsafe { rust_elisp_nil() }, SCM_ELISP_NIL);
    }

    #[test]
    fn is_false_covers_nil() {
        enter();
        unsafe {
            assert_ne!(rust_is_false(rust_bool_false()), 0);
            assert_ne!(rust_is_false(rust_elisp_nil()), 0);
            for obj in [rust_bool_true(), scm_eol(), scm_from_int32(0), rust_unspecified()] {
                assert_eq!(rust_is_false(obj), 0, "{obj:?} is false");
            }
        }
    }

    #[test]
    fn singletons_are_stable_and_distinct() {
        enter();
        let (u1, u2) = unsafe { (rust_unspecified(), rust_unspecified()) };
        let (d1, d2) = unsafe { (scm_undefined(), scm_undefined()) };
        assert_eq!(u1, u2);
        assert_eq!(d1, d2);
        assert_ne!(u1, d1);
    }

    #[test]
    fn eol_is_the_only_null() {
        enter();
        let eol = unsafe { scm_eol() };
        assert!(truthy(unsafe { scm_null_p(eol) }));
        let others = unsafe {
            [
                rust_bool_false(),
                rust_bool_true(),
                rust_unspecified(),
                scm_from_int32(0),
                rust_make_char(0),
                scm_cons(eol, eol),
            ]
        };
        for obj in others {
            assert!(!truthy(unsafe { scm_null_p(obj) }), "{obj:?} is null");
        }
    }

    #[test]
    fn keyword_flags_match_header() {
        assert_eq!(unsafe { scm_allow_other_keys }, SCM_ALLOW_OTHER_KEYS);
        assert_eq!(
            unsafe { scm_allow_non_keyword_arguments },
            SCM_ALLOW_NON_KEYWORD_ARGUMENTS
        );
    }

    #[test]
    fn car_cdr_return_what_cons_stored() {
        enter();
        unsafe {
            let a = scm_from_int32(1);
            let b = rust_make_char('b' as scm_t_wchar);
            let pair = scm_cons(a, b);
            assert_eq!(rust_car(pair), a);
            assert_eq!(rust_cdr(pair), b);

            let list = scm_cons(pair, scm_eol());
            assert_eq!(rust_car(list), pair);
            assert_eq!(rust_cdr(list), SCM_EOL);
        }
    }

    #[test]
    fn make_char_round_trips() {
        enter();
        let samples: [u32; 10] = [
            0, 'A' as u32, 0x7f, 0xff, 0x3bb, 0xd7ff, 0xe000, 0xfffd, 0x1f600, 0x10ffff,
        ];
        for c in samples {
            let back = unsafe {
                let ch = rust_make_char(c as scm_t_wchar);
                assert!(truthy(scm_char_p(ch)));
                scm_to_uint32(scm_char_to_integer(ch))
            };
            assert_eq!(back, c);
        }
    }

    #[test]
    fn smob_tag_and_data() {
        enter();
        let tag = new_smob_type(c"guile-sys-test-a");
        let other = new_smob_type(c"guile-sys-test-b");
        assert_ne!(tag, other);

        unsafe {
            let obj = rust_new_smob(tag, 0xDEADBEEF);
            assert_ne!(rust_smob_predicate(tag, obj), 0);
            assert_eq!(rust_smob_predicate(other, obj), 0);
            assert_eq!(rust_smob_data(obj) as usize, 0xDEADBEEF);
            assert_ne!(rust_is_heap_object(obj), 0);
        }
    }

    #[test]
    fn smob_predicate_rejects_immediates() {
        enter();
        let tag = new_smob_type(c"guile-sys-test-c");
        unsafe {
            for obj in [rust_bool_true(), scm_eol(), scm_from_int32(7), rust_make_char(65)] {
                assert_eq!(rust_smob_predicate(tag, obj), 0);
            }
            assert_eq!(rust_smob_predicate(tag, scm_cons(scm_eol(), scm_eol())), 0);
        }
    }

    #[test]
    fn heap_object_classification() {
        enter();
        unsafe {
            let immediates = [
                scm_from_int32(0),
                scm_from_int32(-12),
                rust_make_char('x' as scm_t_wchar),
                rust_bool_true(),
                rust_bool_false(),
                scm_eol(),
                rust_unspecified(),
            ];
            for obj in immediates {
                assert_eq!(rust_is_heap_object(obj), 0, "{obj:?} is boxed");
            }

            let pair = scm_cons(scm_from_int32(1), scm_eol());
            assert_ne!(rust_is_heap_object(pair), 0);
        }
    }
}
