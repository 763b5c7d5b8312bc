/// Common components.

pub mod bits;
