//! Sticker placement and compositing engine for the monke photo editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive part of the editor: translating raw DOM input events into
//! placement mutations, tracking selection and drag/resize gestures, projecting
//! placements into on-screen overlay views, and flattening the source photo and
//! its overlays into a PNG at native resolution. The host JavaScript layer is
//! responsible only for wiring DOM events to the engine and reacting to the
//! resulting [`engine::Action`]s (opening the identifier prompt, re-rendering).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Top-level `Uploading` / `Editing` coordinator |
//! | [`engine`] | Gesture controller and testable [`engine::EngineCore`] |
//! | [`doc`] | Placement type and the ordered placement store |
//! | [`geometry`] | Display geometry and pixel/ratio conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against placements and their handles |
//! | [`render`] | On-screen overlay layer projection |
//! | [`compositor`] | Native-resolution export to PNG |
//! | [`asset`] | Overlay asset URL resolution |
//! | [`upload`] | Data URI decoding for the uploaded photo |
//! | [`config`] | Editor tunables with serde defaults |
//! | [`consts`] | Shared numeric constants |

pub mod asset;
pub mod compositor;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod session;
pub mod upload;

#[cfg(target_arch = "wasm32")]
pub mod web;
