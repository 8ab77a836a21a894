//! Rule evaluation logic for the payroll engine.
//!
//! This module contains the pure computation core: per-kind amount
//! functions for percentage, capped percentage, progressive bracket, and
//! tiered fixed rules, the monetary rounding helper, and the ordered
//! evaluation driver that turns a compensation snapshot and a region's
//! rule set into itemized deduction and contribution lines.

mod capped_percentage;
mod evaluator;
mod percentage;
mod progressive_bracket;
mod rounding;
mod tiered_fixed;

pub use capped_percentage::capped_percentage_amount;
pub use evaluator::{Evaluation, evaluate};
pub use percentage::percentage_amount;
pub use progressive_bracket::progressive_bracket_amount;
pub use rounding::round_line;
pub use tiered_fixed::tiered_fixed_amount;
