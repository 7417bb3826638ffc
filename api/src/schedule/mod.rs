//! Schedule module
//!
//! Pure schedule algorithms: local time handling, gap filling, block
//! annotation and week tabulation.

pub mod blocks;
pub mod filler;
pub mod table;
pub mod time;

pub use filler::{fill, Filler};
pub use table::{tabulate, TableCell, TableRow};
pub use time::{iso_to_gregorian, TimeContext};
