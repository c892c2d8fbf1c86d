//! Scene lifecycle subsystem.
//!
//! Responsibilities:
//! - define the `Scene` capability contract (init/update/draw plus enter/exit
//!   hooks) and the per-call context handed to it
//! - own the ordered scene registry and the transition machine
//! - buffer scene-requested runtime commands (`Director`) so transitions are
//!   never re-entrant

mod ctx;
mod director;
mod error;
mod manager;
mod scene;

pub use ctx::{SceneCtx, SurfaceInfo};
pub use director::Director;
pub(crate) use director::DirectorCmd;
pub use error::SceneError;
pub use manager::SceneManager;
pub use scene::{Scene, SceneInfo};
