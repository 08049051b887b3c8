mod bit;
pub use bit::*;

pub mod input;
pub mod notice;

mod ribbit_communication;
pub use ribbit_communication::*;

mod window_resizing;
