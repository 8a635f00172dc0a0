//! Core persistence logic - framework-agnostic client and account operations.

pub mod client;

pub use client::{
    delete_client_by_id, find_all_clients, find_client_by_id, save_client, seed_demo_client,
};
