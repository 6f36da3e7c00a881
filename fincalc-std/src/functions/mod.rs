//! Standard math functions

mod aggregate;
mod math;
mod trig;

pub use aggregate::{AVG, MAX, MIN, PRODUCT, SUM};
pub use math::{factorial, ABS, CBRT, CEIL, EXP, FACT, FLOOR, LN, LOG, POW, ROUND, SQRT};
pub use trig::{ACOS, ASIN, ATAN, COS, SIN, TAN};
