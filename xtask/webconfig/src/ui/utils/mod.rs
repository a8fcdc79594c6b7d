pub mod input;
pub mod sequence;

pub use input::TextInput;
pub use sequence::RequestSequencer;
