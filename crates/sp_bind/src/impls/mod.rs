//! [`Bind`](crate::Bind) implementations for std and `bytes` types.

mod collections;
mod pointer;
mod scalar;
