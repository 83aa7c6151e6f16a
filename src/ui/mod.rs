// UI module - Slint window and event loop bridge
//
// This module contains:
// - UiBridge: Queues UI updates from worker threads onto the Slint event loop
// - WindowController: Owns the main window, tick timer, spinner and log panel

pub mod bridge;
pub mod controller;

pub use bridge::UiBridge;
pub use controller::WindowController;
