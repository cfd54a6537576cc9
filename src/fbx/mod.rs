//! Native reader for the binary FBX format.
//!
//! ## File Structure
//!
//! ```text
//! +-----------------------------+
//! | "Kaydara FBX Binary  \0"    |  21 bytes
//! +-----------------------------+
//! | 0x1A 0x00                   |  2 bytes
//! +-----------------------------+
//! | Version                     |  4 bytes (u32 LE, e.g. 7400)
//! +-----------------------------+
//! | Node records ...            |  offsets are u64 from 7500 on
//! +-----------------------------+
//! | Null record, footer         |
//! +-----------------------------+
//! ```

mod format;
mod importer;
mod node;
mod reader;
mod scene;

pub use format::*;
pub use importer::*;
pub use node::*;
pub use reader::*;
pub use scene::*;
