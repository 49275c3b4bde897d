// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod points;
pub mod transfers;

pub use points::{Point, PointRegistry};
pub use transfers::{ProductTransfer, TransferRegistry};
