pub mod chatbot;
pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod finnhub;
pub mod guide;
pub mod input;
pub mod ledger;
pub mod market_data;
pub mod model;
pub mod quiz;
pub mod sequencer;
pub mod tracker;
pub mod trading;
pub mod ui;
pub mod ui_handlers;
