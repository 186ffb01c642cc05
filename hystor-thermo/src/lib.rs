//! Gas and water property models for the hystor components.
//!
//! Gas models work on amounts of substance in a fixed volume rather than on
//! specific (per-mass) states, because storage and electrolyzer balances are
//! written in moles.

mod error;

pub mod model;
pub mod water;

pub use error::PropertyError;
