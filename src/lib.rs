//! Positional posting-list codec for inverted index keywords.
//!
//! For one keyword, the engine needs to remember every document it occurs in
//! and every position inside each document, then answer three questions fast:
//! give me everything (decode), give me one document (lookup), give me the
//! documents two keywords share (match). This crate is the byte format and
//! the three consumers, nothing else; tokenisation, file layout, query
//! parsing, and ranking live with the callers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌───────────────────┐
//! │  types.rs   │────▶│  codec/       │────▶│  verify.rs        │
//! │  (Posting,  │     │  varint.rs    │     │  (verify_blob,    │
//! │  8:24 pack) │     │  frame.rs     │     │   BlobReport)     │
//! └─────────────┘     │  table.rs     │     └───────────────────┘
//!        │            │  mod.rs       │              │
//!        ▼            └───────────────┘              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       contracts.rs                           │
//! │   (debug-mode caller contracts, compile-time format asserts) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use poscodec::{decode, encode, find_doc, intersect, lookup, Posting};
//!
//! let rust = encode(&[
//!     Posting::packed(2, 0, 14),
//!     Posting::packed(7, 1, 3),
//!     Posting::packed(7, 1, 90),
//! ]);
//! let codec = encode(&[Posting::packed(7, 0, 5)]);
//!
//! assert_eq!(decode(&rust).len(), 3);
//! assert!(find_doc(&rust, 7).is_some());
//! assert_eq!(intersect(&rust, &codec), vec![7]);
//! assert_eq!(lookup(&rust, &codec, 7).len(), 3);
//! ```
//!
//! Blobs are immutable after `encode`; any number of readers may share one
//! without synchronisation. All operations are single-threaded per call.

// Module declarations
pub mod codec;
pub mod contracts;
mod types;
pub mod verify;

// Re-exports for public API
pub use codec::{decode, encode, find_doc, intersect, lookup, postings_start};
pub use types::{
    postings_from_flat, postings_to_flat, Posting, FIELD_ID_BITS, IN_FIELD_BITS, IN_FIELD_MASK,
};
pub use verify::{verify_blob, BlobReport, InvariantError};
