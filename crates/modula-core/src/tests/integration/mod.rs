#![cfg(test)]

pub mod common;
pub mod lifecycle_tests;
pub mod sharing_tests;
