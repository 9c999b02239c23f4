// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Build script to emit custom cfg flags based on feature selection.
//!
//! This enables cleaner conditional compilation in code and tests:
//! - `#[cfg(parallel_enum)]` instead of `#[cfg(feature = "parallel")]`

fn main() {
    // Declare the custom cfg names to avoid warnings
    println!("cargo:rustc-check-cfg=cfg(parallel_enum)");

    #[cfg(feature = "parallel")]
    println!("cargo:rustc-cfg=parallel_enum");
}
