//! Run state assembled by the generation stages.

mod initial;

pub use initial::InitialState;
