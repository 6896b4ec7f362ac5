//! Image variant generation in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Orientation** | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | **Fit within box** | [`fit_within`] + `resize_exact` (Lanczos3) |
//! | **Encode** | format inferred from the output extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use operations::{ImageVariants, VariantSpec, create_variants, plan_variants};
pub use params::{FitParams, Quality};
pub use rust_backend::RustBackend;
