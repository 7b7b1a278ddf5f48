//! # qrsmith
//!
//! A Rust library for encoding QR codes (ISO/IEC 18004) with Reed-Solomon
//! error correction and automatic mask selection.
//!
//! ## Features
//!
//! - **Content classification**: Numeric, Alphanumeric, Byte and Kanji modes
//!   detected from the input, or forced explicitly
//! - **Version planning**: The smallest version (1-40) that fits the content
//!   at the requested error correction level, or a validated caller choice
//! - **Reed-Solomon error correction**: All four levels (L, M, Q, H) with the
//!   standard's block layout and codeword interleaving
//! - **Mask selection**: All 8 mask patterns scored with the standard's four
//!   penalty rules, lowest total wins deterministically
//!
//! The result is a module matrix plus its version, error level and mask
//! metadata, ready for any downstream renderer. Rendering itself is out of
//! scope; a renderer drawing at `scale` pixels per module with a quiet zone
//! of `qz` modules needs `scale * width + 2 * qz * scale` pixels per side.
//!
//! ## Quick start
//!
//! ```rust
//! use qrsmith::{ECLevel, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("HELLO WORLD").ec_level(ECLevel::Q).build()?;
//!
//! let matrix = qr.bit_matrix();
//! assert_eq!(matrix.len(), qr.width());
//! # Ok(())
//! # }
//! ```
//!
//! ## Full configuration
//!
//! ```rust
//! use qrsmith::{ECLevel, MaskPattern, Mode, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("8675309")
//!     .version(5)                 // Symbol version; smallest fitting version if not set
//!     .ec_level(ECLevel::M)       // Error correction level; defaults to ECLevel::H
//!     .mode(Mode::Numeric)        // Encoding mode; classified from the content if not set
//!     .mask(MaskPattern::new(3))  // Mask pattern; best scoring mask if not set
//!     .build()?;
//!
//! assert_eq!(qr.width(), 37);
//! # Ok(())
//! # }
//! ```
//!
//! ## Raw bytes and explicit encodings
//!
//! ```rust
//! use qrsmith::{Content, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Raw bytes pass through untouched
//! let bytes = QRBuilder::new(Content::Bytes(b"\x01\x02\x03")).build()?;
//!
//! // Byte-mode text defaults to ISO 8859-1; any encoding_rs label works
//! let text = QRBuilder::new("grüße").encoding("utf-8").build()?;
//! assert_eq!(bytes.width(), text.width());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::{Content, Mode};
pub use common::error::{QRError, QRResult};
pub use common::mask::{MaskPattern, PenaltyScore};
pub use common::metadata::{Color, ECLevel, Version};
