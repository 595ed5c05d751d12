//! CLI command handlers

pub mod commands;

pub use commands::{
    batch_clear, batch_list, batch_remove, calc, import, month, slips, summary, template,
    SingleEntry,
};
