//! Core domain: UI screens outside of gameplay.

pub(crate) mod character_select;
