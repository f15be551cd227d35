mod result;
mod selection;

pub use result::{Detection, Frame};
pub use selection::SelectionPolicy;
