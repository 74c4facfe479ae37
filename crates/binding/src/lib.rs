//! Contract bindings for the ERC20 token driven by the runner.
//!
//! Bindings are generated at build time by alloy's `sol!` macro from the JSON
//! ABI under `abi/`, so the call surface always matches the schema.

pub mod token;
