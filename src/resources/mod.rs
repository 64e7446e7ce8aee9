pub mod constants;
pub mod input;
pub mod runtime;
pub mod selection;
pub mod settings;
pub mod viewport;

pub use input::*;
pub use runtime::*;
pub use selection::*;
pub use settings::*;
pub use viewport::*;
