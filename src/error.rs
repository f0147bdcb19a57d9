use thiserror::Error;

/// Error raised synchronously by mutators that receive an out-of-domain value.
///
/// These are programmer errors, not recoverable runtime conditions: the
/// mutator fails at the call site and leaves the previously stored value
/// untouched. Nothing in this crate retries or defaults on one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid argument `{argument}`: {reason}")]
pub struct InvalidArgument {
    /// Name of the rejected argument.
    pub argument: &'static str,
    /// Why the value was rejected.
    pub reason: &'static str,
}

impl InvalidArgument {
    pub fn new(argument: &'static str, reason: &'static str) -> Self {
        Self { argument, reason }
    }
}
