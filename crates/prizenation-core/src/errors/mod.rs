mod model;

pub use model::{ConfigPathScope, ExitCode, MachineError};
