// src/utils/mod.rs

pub mod auth_client;
pub mod hash;
pub mod jwt;
