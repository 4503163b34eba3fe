//! Shared request/response types and signature helpers for tastycart.
//!
//! Everything here is plain data: no I/O, no database types. The server and
//! core crates both build on it, and a storefront frontend written in Rust can
//! depend on it alone.

pub mod objects;
pub mod signature;
