use crate::utils::unit_err;

unit_err!(
    /// A pair accessor was used on something that isn't a pair.
    NotAPair: "value is not a pair"
);
unit_err!(
    /// The value isn't a character, or its code point isn't a Unicode scalar value.
    NotAChar: "value is not a character"
);
unit_err!(
    /// The value isn't a smob of the expected type.
    WrongSmobType: "value is not a smob of this type"
);
unit_err!(
    /// Smob type names are passed to C, so they can't contain NUL.
    InvalidName: "smob type name contains a NUL byte"
);
unit_err!(
    /// The optional and rest parameters asked for outnumber the function's parameters.
    ArityMismatch: "more optional and rest parameters than the function takes"
);
unit_err!(
    /// Guile left the thunk through a non-local exit.
    GuileExit: "guile exited the callback non-locally"
);
