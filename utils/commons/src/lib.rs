//! It exposes all common errors, types, event tags and host extensions shared by the auction
//! contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{cis2_token::*, constants::*, errors::*, types::*};
use concordium_cis2::*;
use concordium_std::*;

pub mod test;

mod cis2_token;
mod constants;
mod errors;
mod types;
