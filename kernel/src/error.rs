use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    /// The store aborted the transaction in favour of a conflicting one.
    Concurrency,
    /// The store did not answer in time, e.g. the connection pool was exhausted.
    Timeout,
    /// The caller sent something that cannot be applied to a book.
    /// A printable `String` attachment describes what was wrong.
    Invalid,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Invalid => write!(f, "Invalid input"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
