// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod id;
pub mod enums;
pub mod account;

pub use account::Account;
pub use enums::TransferType;
pub use id::{PointId, TransferId, Version};
