//! Smobs: Rust data carried inside a Guile value.
//!
//! A smob is a type tag plus one data word. Here the word is always a `Box<RwLock<T>>` pointer;
//! guile owns the box once [`SmobTag::make`] returns and drops it from the smob's free function.
//! The lock is what lets Rust code mutate data that Scheme code can reach at the same time.
use std::any::type_name;
use std::ffi::CString;
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::panic::AssertUnwindSafe;

use guile_sys::*;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::debug::log;
use crate::error::{InvalidName, WrongSmobType};
use crate::utils::reentry;
use crate::value::Value;

/// Data that can live in a smob.
pub trait SmobData: Send + Sync + Sized + 'static {
    /// How `display` and `write` show the smob.
    fn print(&self) -> String {
        format!("#<{}>", type_name::<Self>())
    }

    /// `equal?` between two smobs of this type. Only called for distinct objects; the default
    /// leaves `equal?` as strict as `eq?`.
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

/// A registered smob type whose data is a `T`.
pub struct SmobTag<T: SmobData> {
    tag: scm_t_bits,
    _data: PhantomData<fn() -> T>,
}

impl<T: SmobData> Clone for SmobTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SmobData> Copy for SmobTag<T> {}

impl<T: SmobData> std::fmt::Debug for SmobTag<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmobTag")
            .field("tag", &format_args!("{:#x}", self.tag))
            .field("data", &type_name::<T>())
            .finish()
    }
}

/// `obj` must be a live smob made by a `SmobTag<T>`
unsafe fn cell<'a, T: SmobData>(obj: SCM) -> &'a RwLock<T> {
    &*rust_smob_data(obj).cast::<RwLock<T>>()
}

unsafe extern "C" fn smob_free<T: SmobData>(obj: SCM) -> usize {
    let data: *mut RwLock<T> = rust_smob_data(obj).cast();
    reentry(AssertUnwindSafe(|| drop(Box::from_raw(data))));
    0
}

unsafe extern "C" fn smob_print<T: SmobData>(
    obj: SCM,
    port: SCM,
    _pstate: *mut scm_print_state,
) -> c_int {
    let data = cell::<T>(obj);
    let s = reentry(AssertUnwindSafe(|| match data.try_read() {
        Some(data) => data.print(),
        // held for writing, possibly by the thread printing it
        None => format!("#<{} (locked)>", type_name::<T>()),
    }));
    let s = CString::new(s).unwrap_or_else(|e| {
        let nul = e.nul_position();
        let mut bytes = e.into_vec();
        bytes.truncate(nul);
        CString::new(bytes).unwrap_or_default()
    });
    scm_puts(s.as_ptr(), port);
    1
}

unsafe extern "C" fn smob_equal<T: SmobData>(a: SCM, b: SCM) -> SCM {
    let (a, b) = (cell::<T>(a), cell::<T>(b));
    let same = reentry(AssertUnwindSafe(|| match (a.try_read(), b.try_read()) {
        (Some(a), Some(b)) => SmobData::eq(&*a, &*b),
        _ => false,
    }));
    Value::from_bool(same).raw()
}

impl<T: SmobData> SmobTag<T> {
    /// Register a new smob type called `name`.
    ///
    /// # Safety
    ///
    /// Must be in guile mode. Guile has room for a few hundred smob types per process, so this
    /// belongs in one-time setup.
    pub unsafe fn register(name: &str) -> Result<Self, InvalidName> {
        let cname = CString::new(name).map_err(|_| InvalidName)?;
        // the data word holds a pointer, guile never allocates the payload itself
        let tag = scm_make_smob_type(cname.as_ptr(), 0);
        scm_set_smob_free(tag, Some(smob_free::<T>));
        scm_set_smob_print(tag, Some(smob_print::<T>));
        scm_set_smob_equalp(tag, Some(smob_equal::<T>));

        log!("registered smob type {} ({}) as {:#x}", name, type_name::<T>(), tag);

        Ok(SmobTag {
            tag,
            _data: PhantomData,
        })
    }

    pub fn tag(&self) -> scm_t_bits {
        self.tag
    }

    /// Move `data` into a new smob.
    ///
    /// # Safety
    ///
    /// Must be in guile mode.
    pub unsafe fn make(&self, data: T) -> Value {
        let raw = Box::into_raw(Box::new(RwLock::new(data)));
        Value::from_raw(rust_new_smob(self.tag, raw as scm_t_bits))
    }

    pub fn is_instance(&self, obj: Value) -> bool {
        unsafe { rust_smob_predicate(self.tag, obj.raw()) != 0 }
    }

    /// Shared borrow of the data of a smob of this type. Blocks while a
    /// [`data_mut`](Self::data_mut) guard is alive.
    ///
    /// # Safety
    ///
    /// `obj` must stay reachable for `'a`, or the collector may free the data under the borrow.
    pub unsafe fn data<'a>(&self, obj: Value) -> Result<RwLockReadGuard<'a, T>, WrongSmobType> {
        if !self.is_instance(obj) {
            return Err(WrongSmobType);
        }
        Ok(cell::<T>(obj.raw()).read())
    }

    /// Exclusive borrow of the data of a smob of this type.
    ///
    /// # Safety
    ///
    /// As [`data`](Self::data).
    pub unsafe fn data_mut<'a>(&self, obj: Value) -> Result<RwLockWriteGuard<'a, T>, WrongSmobType> {
        if !self.is_instance(obj) {
            return Err(WrongSmobType);
        }
        Ok(cell::<T>(obj.raw()).write())
    }
}
