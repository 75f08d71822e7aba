//! Directional proximity and adjacency engine for the diagram canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and is also
//! linked natively by the CLI. It keeps the shapes on the canvas, and after
//! every drag, resize, add or remove it recomputes which arrow endpoints touch
//! which shapes. The result is an ordered list of directed `(source, target)`
//! relations that the host submits to the relation sink.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Points, bounding boxes, transforms and connector endpoints |
//! | [`proximity`] | Point-versus-box tolerance test |
//! | [`adjacency`] | One connector/shape pair to a directed [`adjacency::Relation`] |
//! | [`relations`] | Exhaustive relation set rebuild and the submission payload |
//! | [`doc`] | In-memory document store and shape types |
//! | [`input`] | Change events, the Idle/Dirty tracker and selection state |
//! | [`engine`] | Editor core tying the store, tracker and relation set together |
//! | [`scene`] | JSON scene files loaded into an editor session |
//! | [`wasm`] | `wasm-bindgen` facade for the browser host |
//! | [`consts`] | Shared numeric constants (default sizes, minimum size, threshold) |

pub mod adjacency;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod proximity;
pub mod relations;
pub mod scene;
pub mod wasm;
