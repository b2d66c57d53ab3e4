pub mod config;
pub mod contract;
pub mod controller;
pub mod document;
pub mod hotkey;
pub mod logging;
pub mod memory_dom;
pub mod mnemonic;
pub mod model;
pub mod overlay_state;
pub mod popup;
pub mod runtime;
pub mod search;
pub mod settings;
