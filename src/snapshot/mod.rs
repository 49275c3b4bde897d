// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod encode;
pub mod decode;

pub use encode::encode_state;
pub use decode::decode_state;
