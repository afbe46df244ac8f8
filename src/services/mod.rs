//! Session-scoped services.
//!
//! ARCHITECTURE
//! ============
//! `chat` owns the coordination logic. The other modules define the
//! collaborators it depends on, each as a trait plus one in-memory
//! implementation, so a host application can swap in its own UI-backed
//! versions.

pub mod chat;
pub mod menu;
pub mod notification;
pub mod participant;
