// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod columns;
pub mod filter;
pub mod format;
pub mod ids;
pub mod model;
pub mod rows;
pub mod sort;
pub mod state;

pub use columns::*;
pub use filter::*;
pub use format::*;
pub use ids::*;
pub use model::*;
pub use rows::*;
pub use sort::*;
pub use state::*;
