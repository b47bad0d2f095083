pub mod err;
pub mod r;

pub use err::E;
pub use r::R;
