//! Entering guile mode, and keeping values alive outside of it.
//!
//! Guile must never unwind into Rust and vice-versa. Callbacks from guile go through
//! [`reentry`](crate::reentry), and closures run under [`with_guile`] must not hold values
//! with meaningful drops across anything that can throw.
use std::{ffi::CStr, mem::ManuallyDrop, os::raw::c_int, panic::AssertUnwindSafe, ptr};

use guile_sys::*;
use libc::c_void;

mod convert;
pub use convert::ToScm;

use crate::{
    debug::log,
    error::{ArityMismatch, GuileExit},
    utils::reentry,
    value::Value,
};

pub type ScmFn0 = unsafe extern "C" fn() -> SCM;
pub type ScmFn1 = unsafe extern "C" fn(SCM) -> SCM;
pub type ScmFn2 = unsafe extern "C" fn(SCM, SCM) -> SCM;
pub type ScmFn3 = unsafe extern "C" fn(SCM, SCM, SCM) -> SCM;
pub type ScmFn4 = unsafe extern "C" fn(SCM, SCM, SCM, SCM) -> SCM;

/// A C function guile can call as a primitive procedure.
///
/// # Safety
///
/// `ARITY` must be the number of `SCM` parameters the function takes.
pub unsafe trait Subr: Copy {
    const ARITY: usize;

    fn as_subr(self) -> scm_t_subr;
}

macro_rules! impl_subr {
    ($($fn_ty:ty => $arity:expr),* $(,)?) => {
        $(
            unsafe impl Subr for $fn_ty {
                const ARITY: usize = $arity;

                fn as_subr(self) -> scm_t_subr {
                    self as scm_t_subr
                }
            }
        )*
    };
}

impl_subr!(ScmFn0 => 0, ScmFn1 => 1, ScmFn2 => 2, ScmFn3 => 3, ScmFn4 => 4);

/// Define `f` as a procedure called `name` in the current module.
///
/// The last `optional` parameters may be left out by the caller (they arrive as
/// [`Value::undefined`]), and with `rest` the final parameter receives the remaining arguments as
/// a list. Everything before those is required.
///
/// ```ignore
/// let f: ScmFn2 = my_add;
/// define_fn(c"my-add", 0, false, f)?;
/// ```
///
/// # Safety
///
/// Must be in guile mode. `f` is called from guile, so it must not unwind; wrap Rust code that can
/// panic in [`reentry`](crate::reentry).
pub unsafe fn define_fn<F: Subr>(
    name: &CStr,
    optional: usize,
    rest: bool,
    f: F,
) -> Result<Value, ArityMismatch> {
    let trailing = optional + rest as usize;
    if trailing > F::ARITY {
        return Err(ArityMismatch);
    }
    let required = F::ARITY - trailing;

    let procedure = scm_c_define_gsubr(
        name.as_ptr(),
        required as c_int,
        optional as c_int,
        rest as c_int,
        f.as_subr(),
    );
    log!(
        "defined {} ({} required, {} optional, rest {})",
        name.to_string_lossy(),
        required,
        optional,
        rest
    );
    Ok(Value::from_raw(procedure))
}

/// Read and evaluate `expr` in the current module, returning the value of the last expression.
/// Errors in the code are thrown as guile exceptions.
///
/// # Safety
///
/// Must be in guile mode, and a throw escapes as a non-local exit; see [`with_guile`].
pub unsafe fn eval(expr: &str) -> Value {
    let code = scm_from_utf8_stringn(expr.as_ptr().cast(), expr.len());
    Value::from_raw(scm_eval_string(code))
}

/// Put the calling thread into guile mode for the rest of its life, booting guile if needed.
pub fn init_thread() {
    unsafe { scm_init_guile() };
}

/// Run `f` in guile mode. Returns `Err` if guile left `f` through a non-local exit, after guile
/// has printed the uncaught exception.
///
/// # Safety
///
/// A non-local exit out of `f` skips every Rust destructor between the throw and this call, so
/// anything `f` owns at that point is leaked or left half-updated.
pub unsafe fn with_guile<F, T>(f: F) -> Result<T, GuileExit>
where
    F: FnOnce() -> T,
{
    union Func<F, T> {
        f: ManuallyDrop<F>,
        t: ManuallyDrop<T>,
    }

    let mut func = Func {
        f: ManuallyDrop::new(f),
    };

    unsafe extern "C" fn thunk<F, T>(p: *mut c_void) -> *mut c_void
    where
        F: FnOnce() -> T,
    {
        let p: *mut Func<F, T> = p.cast();
        let f = ManuallyDrop::into_inner(ptr::read(&(*p).f));
        let res = reentry(AssertUnwindSafe(f));
        (*p).t = ManuallyDrop::new(res);

        p.cast()
    }

    let f: *mut Func<_, _> = &mut func;
    let res = scm_with_guile(Some(thunk::<F, T>), f.cast());

    if res.is_null() {
        log!("guile exited non-locally");
        Err(GuileExit)
    } else {
        Ok(ManuallyDrop::into_inner(func.t))
    }
}

/// Wrapper for scm objects so that they can be safely put on the Rust heap.
///
/// Guile's collector only scans the stack and its own heap, so a value stored in a `Box` or `Vec`
/// has to be rooted explicitly.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq)]
pub struct ProtectedScm(Value);

impl ProtectedScm {
    /// # Safety
    ///
    /// Must be in guile mode, and `obj` must still be reachable.
    pub unsafe fn protect(obj: Value) -> Self {
        scm_gc_protect_object(obj.raw());
        ProtectedScm(obj)
    }

    pub fn get(&self) -> Value {
        self.0
    }
}

impl Drop for ProtectedScm {
    fn drop(&mut self) {
        unsafe { scm_gc_unprotect_object(self.0.raw()) };
    }
}

/// UTF-8 string handed out by guile. It was allocated with C malloc, so it is freed with free.
pub struct ScmString {
    len: usize,
    msg: *mut std::os::raw::c_char,
}

unsafe impl Send for ScmString {}
unsafe impl Sync for ScmString {}

impl ScmString {
    /// # Safety
    ///
    /// Must be in guile mode and `obj` must be a string, otherwise guile throws.
    pub unsafe fn from_scm(obj: Value) -> Self {
        let mut len = 0;
        let msg = scm_to_utf8_stringn(obj.raw(), &mut len);
        ScmString { len, msg }
    }
}

impl std::borrow::Borrow<str> for ScmString {
    fn borrow(&self) -> &str {
        self
    }
}

impl std::ops::Deref for ScmString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        unsafe {
            let s = std::slice::from_raw_parts(self.msg as *const u8, self.len);
            std::str::from_utf8_unchecked(s)
        }
    }
}

impl std::fmt::Display for ScmString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &str = self;
        <str as std::fmt::Display>::fmt(s, f)
    }
}

impl std::fmt::Debug for ScmString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &str = self;
        <str as std::fmt::Debug>::fmt(s, f)
    }
}

impl Drop for ScmString {
    fn drop(&mut self) {
        unsafe { libc::free(self.msg.cast()) };
    }
}
