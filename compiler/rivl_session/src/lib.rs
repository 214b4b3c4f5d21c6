//! RIVL Session - the per-run context of the RIVL interpreter.
//!
//! A [`Session`] owns everything a script run declares: the element types,
//! the stack of live scopes, and the variable store. Sessions are
//! independent; two interpreters in one process never share variables.
//!
//! # Logging
//!
//! All crates log through `tracing`. Call [`init_tracing`] once at startup
//! and enable output with `RUST_LOG`, e.g. `RUST_LOG=rivl_vars=trace`.

mod scope_stack;
mod session;

pub use scope_stack::ScopeStack;
pub use session::{Session, SessionConfig, SessionError};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            if let Err(e) = tracing_subscriber::registry()
                .with(filter)
                .with(tree)
                .try_init()
            {
                eprintln!("rivl: tracing already initialized ({e})");
            }
        }
    });
}
