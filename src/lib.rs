//! Ranch Breeding - breeding-cycle lifecycle engine for livestock herds.
//!
//! A breeding cycle follows one dam from breeding plan through heat,
//! service, pregnancy and calving to weaning or culling. This crate
//! validates each proposed transition, derives efficiency, reproduction,
//! economic and alert metrics, and commits the result through ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
