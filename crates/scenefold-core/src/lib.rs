pub mod accordion;
pub mod config;
pub mod error;
pub mod logic;
pub mod portal;
pub mod stack;
pub mod surface;
pub mod tab_bar;
pub mod telemetry;

pub use accordion::{AccordionEngine, AccordionHandle, AccordionKind};
pub use config::{AccordionConfig, EasingType, SnapConfig, SnapStrategy};
pub use error::{Error, Result};
pub use logic::{LogicHandle, LogicRuntime};
pub use portal::{FooterPortal, FooterRender, FooterWrapperInfo, SceneFooter, SceneId};
pub use stack::{mount_stack, StackContext, StackRenderer};
pub use telemetry::{Offset, ScrollAttachment, ScrollCallback, ScrollTelemetryHub};
