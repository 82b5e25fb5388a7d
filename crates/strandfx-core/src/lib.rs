#![forbid(unsafe_code)]

//! Simulation and drawing core for the strandfx canvas backdrops.
//!
//! The crate is platform-independent. Two seams keep it that way:
//!
//! - [`surface::Surface`] receives draw calls (gradient strokes, discs,
//!   fills). The web binding implements it over a 2D canvas context; tests
//!   use [`headless::RecordingSurface`].
//! - [`host::Host`] owns the platform hooks: listener registration,
//!   animation-frame requests and the viewport size. The web binding maps
//!   these onto `window`; tests use [`headless::HeadlessHost`].
//!
//! Time is always supplied by the host (a high-resolution timestamp in
//! milliseconds), and every random draw comes from a seeded generator, so a
//! run is reproducible from `(config, seed, event script)`.

pub mod config;
pub mod effect;
pub mod error;
pub mod field;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod mount;
pub mod palette;
pub mod starfield;
pub mod strand;
pub mod submission;
pub mod surface;
pub mod tracking;

pub use config::{Band, FieldConfig, PerBand, StarfieldConfig};
pub use effect::{BackdropEffect, FrameInputs};
pub use error::{FieldError, Result};
pub use field::FloatingLinesField;
pub use geometry::{CubicBezier, Point, Viewport};
pub use host::{FrameHandle, Host, HostEvent, Listeners};
pub use mount::Mount;
pub use starfield::HyperspaceField;
pub use strand::Strand;
pub use submission::{FormFields, FormKind, Phase, SubmissionDesk};
pub use surface::Surface;
