//! Checked access to Guile values.
//!
//! [`Value`] is a plain copy of a handle, meant for the stack, where the collector finds it on its
//! own. Store it anywhere else through [`ProtectedScm`](crate::ProtectedScm). The tag checks here
//! are what make the unchecked `guile-sys` accessors sound to call.
use guile_sys::*;

use crate::error::{NotAChar, NotAPair};
use crate::guile::{ScmString, ToScm};

/// A Guile value of unknown type. Equality is identity, Scheme's `eq?`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(transparent)]
pub struct Value(SCM);

/// `scm_is_true`: everything but `#f` and `#nil`
fn truthy(obj: SCM) -> bool {
    unsafe { rust_is_false(obj) == 0 }
}

impl Value {
    /// # Safety
    ///
    /// `raw` must be a live handle produced by guile.
    pub unsafe fn from_raw(raw: SCM) -> Self {
        Value(raw)
    }

    /// Convert a Rust value.
    ///
    /// # Safety
    ///
    /// Must be in guile mode.
    pub unsafe fn of<T: ToScm>(x: T) -> Self {
        Value(x.to_scm())
    }

    pub fn raw(self) -> SCM {
        self.0
    }

    /// Out-pointer for C functions that fill in a value, such as
    /// `scm_c_bind_keyword_arguments`.
    pub fn as_mut_ptr(&mut self) -> *mut SCM {
        &mut self.0
    }

    pub fn t() -> Self {
        Value(unsafe { rust_bool_true() })
    }

    pub fn f() -> Self {
        Value(unsafe { rust_bool_false() })
    }

    pub fn from_bool(b: bool) -> Self {
        if b {
            Self::t()
        } else {
            Self::f()
        }
    }

    pub fn unspecified() -> Self {
        Value(unsafe { rust_unspecified() })
    }

    /// The "no value given" marker for optional and keyword arguments. Not the same object as
    /// [`Value::unspecified`].
    pub fn undefined() -> Self {
        Value(unsafe { scm_undefined() })
    }

    /// Emacs Lisp's `nil`. False like `#f`, but a different object.
    pub fn elisp_nil() -> Self {
        Value(unsafe { rust_elisp_nil() })
    }

    /// `'()`
    pub fn eol() -> Self {
        Value(unsafe { scm_eol() })
    }

    pub fn from_char(c: char) -> Self {
        // every char is a valid scalar value, so the cast can't wrap negative
        Value(unsafe { rust_make_char(c as u32 as scm_t_wchar) })
    }

    /// Allocate a fresh pair.
    ///
    /// # Safety
    ///
    /// Must be in guile mode.
    pub unsafe fn cons(car: Value, cdr: Value) -> Self {
        Value(scm_cons(car.0, cdr.0))
    }

    /// Build a proper list.
    ///
    /// # Safety
    ///
    /// Must be in guile mode.
    pub unsafe fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Self::eol(), |tail, item| Self::cons(item, tail))
    }

    /// Scheme truthiness: anything but `#f` and `#nil`, so `0` and `'()` are true.
    pub fn is_true(self) -> bool {
        truthy(self.0)
    }

    /// `#f` or `#nil`.
    pub fn is_false(self) -> bool {
        !self.is_true()
    }

    /// `Some` only for the boolean objects themselves.
    pub fn as_bool(self) -> Option<bool> {
        if self == Self::t() {
            Some(true)
        } else if self.is_false() {
            Some(false)
        } else {
            None
        }
    }

    pub fn is_unspecified(self) -> bool {
        self == Self::unspecified()
    }

    pub fn is_undefined(self) -> bool {
        self == Self::undefined()
    }

    pub fn is_null(self) -> bool {
        truthy(unsafe { scm_null_p(self.0) })
    }

    pub fn is_pair(self) -> bool {
        truthy(unsafe { scm_pair_p(self.0) })
    }

    pub fn is_char(self) -> bool {
        truthy(unsafe { scm_char_p(self.0) })
    }

    /// Whether the value lives on the garbage collected heap, as opposed to being encoded in the
    /// handle itself like fixnums, characters, booleans and `'()`.
    pub fn is_heap_object(self) -> bool {
        unsafe { rust_is_heap_object(self.0) != 0 }
    }

    pub fn car(self) -> Result<Value, NotAPair> {
        if self.is_pair() {
            Ok(Value(unsafe { rust_car(self.0) }))
        } else {
            Err(NotAPair)
        }
    }

    pub fn cdr(self) -> Result<Value, NotAPair> {
        if self.is_pair() {
            Ok(Value(unsafe { rust_cdr(self.0) }))
        } else {
            Err(NotAPair)
        }
    }

    pub fn to_char(self) -> Result<char, NotAChar> {
        if !self.is_char() {
            return Err(NotAChar);
        }
        let n = unsafe { scm_to_uint32(scm_char_to_integer(self.0)) };
        char::from_u32(n).ok_or(NotAChar)
    }

    /// Iterate the elements of a list. Stops at the first tail that isn't a pair, so an improper
    /// list yields everything before its final cdr.
    pub fn iter(self) -> ListIter {
        ListIter { rest: self }
    }

    /// Render with `display`, the way the REPL would print it.
    ///
    /// # Safety
    ///
    /// Must be in guile mode.
    pub unsafe fn to_display_string(self) -> ScmString {
        let port = scm_open_output_string();
        scm_display(self.0, port);
        ScmString::from_scm(Value(scm_get_output_string(port)))
    }
}

pub struct ListIter {
    rest: Value,
}

impl Iterator for ListIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let item = self.rest.car().ok()?;
        self.rest = self.rest.cdr().ok()?;
        Some(item)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::guile::init_thread;

    #[test]
    fn booleans() {
        init_thread();
        assert!(Value::t().is_true());
        assert!(Value::f().is_false());
        assert_ne!(Value::t(), Value::f());
        assert_eq!(Value::from_bool(true), Value::t());
        assert_eq!(Value::f().as_bool(), Some(false));
        assert_eq!(Value::eol().as_bool(), None);
    }

    #[test]
    fn truthiness_follows_scheme() {
        init_thread();
        let zero = unsafe { Value::of(0i32) };
        assert!(zero.is_true());
        assert!(!zero.is_false());
        assert!(Value::eol().is_true());
        assert!(Value::unspecified().is_true());

        let nil = Value::elisp_nil();
        assert!(nil.is_false());
        assert!(!nil.is_true());
        assert_ne!(nil, Value::f());
        assert_eq!(nil.as_bool(), Some(false));
        assert_eq!(zero.as_bool(), None);
    }

    #[test]
    fn unspecified_and_undefined_are_distinct_singletons() {
        assert_eq!(Value::unspecified(), Value::unspecified());
        assert_eq!(Value::undefined(), Value::undefined());
        assert_ne!(Value::unspecified(), Value::undefined());
        assert!(Value::undefined().is_undefined());
        assert!(!Value::undefined().is_unspecified());
    }

    #[test]
    fn null_only_for_eol() {
        init_thread();
        assert!(Value::eol().is_null());
        for v in [Value::f(), Value::t(), Value::unspecified(), Value::from_char('\0')] {
            assert!(!v.is_null(), "{v:?}");
        }
        let empty: [Value; 0] = [];
        assert_eq!(unsafe { Value::list(empty) }, Value::eol());
    }

    #[test]
    fn pair_accessors() {
        init_thread();
        let (a, b) = unsafe { (Value::of(3i32), Value::of("x".len())) };
        let pair = unsafe { Value::cons(a, b) };
        assert!(pair.is_pair());
        assert_eq!(pair.car(), Ok(a));
        assert_eq!(pair.cdr(), Ok(b));
    }

    #[test]
    fn pair_accessors_reject_non_pairs() {
        init_thread();
        for v in [Value::eol(), Value::t(), Value::from_char('p'), unsafe { Value::of(5u32) }] {
            assert_eq!(v.car(), Err(NotAPair));
            assert_eq!(v.cdr(), Err(NotAPair));
        }
    }

    #[test]
    fn chars_round_trip() {
        init_thread();
        for c in ['\0', 'a', 'Z', '\u{7f}', 'é', 'λ', '\u{d7ff}', '\u{e000}', '😀', char::MAX] {
            let v = Value::from_char(c);
            assert!(v.is_char());
            assert_eq!(v.to_char(), Ok(c));
        }
        assert_eq!(Value::t().to_char(), Err(NotAChar));
    }

    #[test]
    fn heap_objects() {
        init_thread();
        let immediates = unsafe {
            [
                Value::of(0i32),
                Value::of(-40i64),
                Value::from_char('q'),
                Value::t(),
                Value::f(),
                Value::eol(),
            ]
        };
        for v in immediates {
            assert!(!v.is_heap_object(), "{v:?}");
        }
        let pair = unsafe { Value::cons(Value::eol(), Value::eol()) };
        assert!(pair.is_heap_object());
        let big = unsafe { Value::of(u64::MAX) };
        assert!(big.is_heap_object());
    }

    #[test]
    fn list_iteration() {
        init_thread();
        let items = unsafe { [Value::of(1u32), Value::of(2u32), Value::of(3u32)] };
        let list = unsafe { Value::list(items) };
        assert_eq!(list.iter().collect::<Vec<_>>(), items);

        let improper = unsafe { Value::cons(items[0], items[1]) };
        assert_eq!(improper.iter().collect::<Vec<_>>(), [items[0]]);
        assert_eq!(Value::eol().iter().count(), 0);
    }

    #[test]
    fn display() {
        init_thread();
        let list = unsafe { Value::list([Value::of(1u32), Value::from_char('a'), Value::t()]) };
        let s = unsafe { list.to_display_string() };
        assert_eq!(&*s, "(1 a #t)");
    }
}
