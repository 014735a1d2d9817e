//! implore-stats - Statistical functions for scientific visualization
//!
//! This crate provides the statistical primitives behind implore's density
//! plots:
//!
//! - **Summary**: finite-value summaries with R type-7 quartiles
//! - **KDE**: weighted Gaussian kernel density estimation with the
//!   `bw.nrd0` rule-of-thumb bandwidth
//! - **Kernel shares**: kernel-smoothed class proportions for stacked
//!   ("conditional") density plots
//!
//! # Design Philosophy
//!
//! Estimators never decide what to do with a degenerate sample. They
//! report a [`KdeError`] and leave skipping or flagging to the caller, so
//! one bad group cannot take down a whole figure.

pub mod kde;
pub mod summary;

pub use kde::*;
pub use summary::*;
