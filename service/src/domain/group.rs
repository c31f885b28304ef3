//! Directory group definitions.

use derive_more::{AsRef, Display, From, Into};

/// Name of a group in the directory.
#[derive(
    AsRef,
    Clone,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Name(String);
