#![no_std]

//! An efficient decoder for TIA series data (.SER) files from FEI
//! transmission electron microscopes.
//!
//! Goniometer decodes a complete series of acquired elements (images or
//! spectra), together with their calibrations and acquisition tags, into
//! an ordered document, and exposes its underlying finite-state machine
//! for applications needing finer control over internals (such as those
//! managing their own buffering).
//!
//! Most users should begin with the decode functions in the [`avec`]
//! module. These are suited to decoding whole documents from files and
//! data slices. If these prove insufficient, consider implementing a
//! decoder as described in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoder (default).

extern crate alloc;

pub mod avec;
pub mod sans;
