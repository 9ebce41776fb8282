//! Interaction engine for the design review canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and also
//! builds natively so the host can drive it headlessly. It owns the state that
//! has real invariants: translating raw input events into view-transform
//! changes, placing image items on the infinite plane, keeping the issue
//! registry per item, and keeping issue selection consistent with the focused
//! item. The presentation layer only renders [`scene::Scene`] snapshots and
//! reacts to the [`engine::Action`]s returned by every handler.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller ([`engine::EngineCore`]) and host actions |
//! | [`camera`] | View transform, pan/zoom math and coordinate conversions |
//! | [`doc`] | Item registry: placed images, layout and stack order |
//! | [`issues`] | Issue registry: design issues scoped to their owning item |
//! | [`selection`] | Focus, hover and cyclic issue navigation |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing items and issue boxes |
//! | [`scene`] | Read-only projection consumed by the presentation layer |
//! | [`ingest`] | Media ingestion seam (file validation and image handles) |
//! | [`config`] | Per-canvas configuration and variant presets |
//! | [`consts`] | Shared numeric constants (zoom limits, layout defaults) |
//! | `dom` | Browser event bindings (`web` feature only) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
#[cfg(feature = "web")]
pub mod dom;
pub mod engine;
pub mod hit;
pub mod ingest;
pub mod input;
pub mod issues;
pub mod scene;
pub mod selection;
