/// Declare a field-less error type with a fixed message.
macro_rules! unit_err {
    ($(#[$meta:meta])* $name:ident: $msg:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($msg)
            }
        }
        impl std::error::Error for $name { }
    };
}

pub(crate) use unit_err;

/// Run Rust code called from guile. A panic must never unwind into C, so it logs and aborts.
pub fn reentry<T>(f: impl FnOnce() -> T + std::panic::UnwindSafe) -> T {
    std::panic::catch_unwind(f).unwrap_or_else(|_| {
        crate::debug::log!("panic in a guile callback, aborting");
        std::process::abort()
    })
}
