use guile_sys::*;

use crate::value::Value;

/// Rust values with a direct Scheme counterpart.
///
/// # Safety
///
/// `to_scm` may allocate (integers outside the fixnum range become bignums), so it must only be
/// called in guile mode.
pub unsafe trait ToScm: Send + Sync {
    unsafe fn to_scm(self) -> SCM;
}

#[cfg(target_pointer_width = "64")]
unsafe impl ToScm for usize {
    unsafe fn to_scm(self) -> SCM {
        scm_from_uint64(self as u64)
    }
}

#[cfg(target_pointer_width = "32")]
unsafe impl ToScm for usize {
    unsafe fn to_scm(self) -> SCM {
        scm_from_uint32(self as u32)
    }
}

unsafe impl ToScm for u64 {
    unsafe fn to_scm(self) -> SCM {
        scm_from_uint64(self)
    }
}

unsafe impl ToScm for i64 {
    unsafe fn to_scm(self) -> SCM {
        scm_from_int64(self)
    }
}

unsafe impl ToScm for u32 {
    unsafe fn to_scm(self) -> SCM {
        scm_from_uint32(self)
    }
}

unsafe impl ToScm for i32 {
    unsafe fn to_scm(self) -> SCM {
        scm_from_int32(self)
    }
}

unsafe impl ToScm for bool {
    unsafe fn to_scm(self) -> SCM {
        Value::from_bool(self).raw()
    }
}

unsafe impl ToScm for char {
    unsafe fn to_scm(self) -> SCM {
        Value::from_char(self).raw()
    }
}

unsafe impl ToScm for () {
    unsafe fn to_scm(self) -> SCM {
        Value::unspecified().raw()
    }
}

unsafe impl ToScm for Value {
    unsafe fn to_scm(self) -> SCM {
        self.raw()
    }
}

unsafe impl<T: ToScm> ToScm for Option<T> {
    /// `None` is `#f`, the usual "no result" in Scheme.
    unsafe fn to_scm(self) -> SCM {
        match self {
            Some(x) => x.to_scm(),
            None => Value::f().raw(),
        }
    }
}
