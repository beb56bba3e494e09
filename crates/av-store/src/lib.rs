//! Asset Variants storage
//!
//! Collaborator contracts consumed by the variant engine, plus two stores:
//!
//! - [`AssetStore`]: load, copy, delete and upsert assets by path; manage directories
//! - [`GraphHost`]: open a stored scene as an editable graph, save and close it
//! - [`InMemoryStore`]: fake store for tests and dry runs
//! - [`FsStore`]: project directory of JSON asset files
//!
//! # Example
//!
//! ```rust
//! use av_asset::{AssetContent, AssetPath, ObjectNode};
//! use av_store::{AssetStore, InMemoryStore};
//!
//! let store = InMemoryStore::default();
//! let path = AssetPath::from("Assets/Orc.prefab");
//! store.create_new(AssetContent::Object(ObjectNode::new("Orc")), &path).unwrap();
//! assert!(store.exists(&path));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fs;
mod graph;
mod memory;
mod store;

pub use error::StoreError;
pub use fs::FsStore;
pub use graph::{GraphHandle, GraphHost, StoreGraphHost};
pub use memory::{InMemoryStore, StoreStats};
pub use store::{load_typed, require_typed, AssetStore, StoredAsset};
