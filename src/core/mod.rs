//! Core payroll arithmetic

pub mod calculator;

pub use calculator::{absence_deduction, net_salary, round2};
