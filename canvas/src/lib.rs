//! Interaction engine for an infinite-canvas whiteboard.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! document (text boxes, shapes, images, arrows, freehand strokes and a mind
//! map), the pan/zoom camera, hit-testing, and the pointer gesture state
//! machine. The host JavaScript layer forwards DOM events to
//! [`web::WebBoard`], draws the scene, and carries out the returned
//! [`engine::Action`]s (opening text editors, persisting snapshots).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser-independent [`engine::EngineCore`] and its actions |
//! | [`web`] | `wasm-bindgen` surface, canvas text metrics and `Date` clock |
//! | [`doc`] | Element types, per-kind stores, selections and snapshots |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, modifiers and the gesture state machine |
//! | [`hit`] | Hit-testing and marquee resolution |
//! | [`drag`] | Multi-element drag sessions |
//! | [`resize`] | Resize and rotate sessions |
//! | [`mindmap`] | Mind-map tree editing and connectors |
//! | [`lifecycle`] | Stroke fading and expiry |
//! | [`autosave`] | Debounced save requests |
//! | [`palette`] | Named gradients |
//! | [`measure`] | Text measurement for auto-sizing |
//! | [`config`] | Runtime tunables |
//! | [`clock`] | Millisecond time sources |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod autosave;
pub mod camera;
pub mod clock;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod hit;
pub mod input;
pub mod lifecycle;
pub mod measure;
pub mod mindmap;
pub mod palette;
pub mod resize;
pub mod web;
